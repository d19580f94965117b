//! Extraction properties over whole companyfacts documents

use pretty_assertions::assert_eq;
use serde_json::json;
use test_log::test;

use crate::common::fixtures::{fact, CompanyFactsBuilder};
use edgar_financials::extractors::FactsExtractor;
use edgar_financials::models::{FinancialStatement, ReportType};

fn extract(raw: Vec<u8>) -> Vec<FinancialStatement> {
    FactsExtractor::with_reference_year(2024).extract(7, &raw).unwrap()
}

fn periods(statements: &[FinancialStatement]) -> Vec<(i32, ReportType)> {
    statements.iter().map(|s| (s.fiscal_year, s.report_type)).collect()
}

#[test]
fn test_annual_statements_capped_at_three_newest_first() {
    let observations = (2018..=2023)
        .map(|fy| fact(json!(fy * 10), "10-K", fy, "FY", None))
        .collect();
    let statements = extract(CompanyFactsBuilder::new().usd("NetIncomeLoss", observations).to_bytes());

    assert_eq!(
        periods(&statements),
        vec![(2023, ReportType::FY), (2022, ReportType::FY), (2021, ReportType::FY)]
    );
    assert_eq!(statements[0].net_income.as_deref(), Some("20230"));
}

#[test]
fn test_quarterly_statements_capped_at_eight_after_annual() {
    let mut observations = vec![fact(json!(1), "10-K", 2023, "FY", None)];
    for fy in 2020..=2023 {
        for fp in ["Q1", "Q2", "Q3"] {
            observations.push(fact(json!(5), "10-Q", fy, fp, None));
        }
    }
    let statements = extract(CompanyFactsBuilder::new().usd("OperatingIncomeLoss", observations).to_bytes());

    assert_eq!(statements.len(), 9);
    assert_eq!(statements[0].report_type, ReportType::FY);
    assert_eq!(
        periods(&statements[1..]),
        vec![
            (2023, ReportType::Q3),
            (2023, ReportType::Q2),
            (2023, ReportType::Q1),
            (2022, ReportType::Q3),
            (2022, ReportType::Q2),
            (2022, ReportType::Q1),
            (2021, ReportType::Q3),
            (2021, ReportType::Q2),
        ]
    );
}

#[test]
fn test_single_quarter_frame_replaces_year_to_date_value() {
    let raw = CompanyFactsBuilder::new()
        .usd(
            "Revenues",
            vec![
                fact(json!(300), "10-Q", 2023, "Q2", None),
                fact(json!(150), "10-Q", 2023, "Q2", Some("CY2023Q2")),
                fact(json!(999), "10-Q", 2023, "Q2", Some("CY2023Q1")),
            ],
        )
        .to_bytes();

    let statements = extract(raw);
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].revenue.as_deref(), Some("150"));
}

#[test]
fn test_annual_value_keeps_first_filing() {
    let raw = CompanyFactsBuilder::new()
        .usd(
            "NetIncomeLoss",
            vec![
                fact(json!(100), "10-K", 2023, "FY", None),
                fact(json!(120), "10-K/A", 2023, "FY", None),
            ],
        )
        .to_bytes();

    assert_eq!(extract(raw)[0].net_income.as_deref(), Some("100"));
}

#[test]
fn test_balance_sheet_needs_instant_frame() {
    let raw = CompanyFactsBuilder::new()
        .usd(
            "Assets",
            vec![
                fact(json!(10), "10-K", 2023, "FY", Some("CY2023")),
                fact(json!(20), "10-K", 2022, "FY", Some("CY2022Q4I")),
                fact(json!(30), "10-Q", 2023, "Q1", Some("CY2023Q1")),
            ],
        )
        .to_bytes();

    let statements = extract(raw);
    assert_eq!(periods(&statements), vec![(2022, ReportType::FY)]);
    assert_eq!(statements[0].total_assets.as_deref(), Some("20"));
}

#[test]
fn test_recent_concept_beats_historical_one() {
    let raw = CompanyFactsBuilder::new()
        .usd(
            "Revenues",
            vec![
                fact(json!(1), "10-K", 2012, "FY", None),
                fact(json!(2), "10-K", 2013, "FY", None),
            ],
        )
        .usd(
            "SalesRevenueNet",
            vec![fact(json!(3), "10-K", 2023, "FY", None)],
        )
        .to_bytes();

    let statements = extract(raw);
    assert_eq!(periods(&statements), vec![(2023, ReportType::FY)]);
    assert_eq!(statements[0].revenue.as_deref(), Some("3"));
}

#[test]
fn test_values_keep_their_digits() {
    let raw = br#"{"facts":{"us-gaap":{
        "Revenues":{"units":{"USD":[{"val":98765432101234,"form":"10-K","fy":2023,"fp":"FY"}]}},
        "NetIncomeLoss":{"units":{"USD":[{"val":-1234.5,"form":"10-K","fy":2023,"fp":"FY"}]}},
        "OperatingIncomeLoss":{"units":{"USD":[{"val":0.30000000000000000004,"form":"10-K","fy":2023,"fp":"FY"}]}}
    }}}"#;

    let statements = FactsExtractor::with_reference_year(2024).extract(1, raw).unwrap();
    assert_eq!(statements[0].revenue.as_deref(), Some("98765432101234"));
    assert_eq!(statements[0].net_income.as_deref(), Some("-1234.5"));
    assert_eq!(statements[0].operating_income.as_deref(), Some("0.30000000000000000004"));
}

#[test]
fn test_shares_joined_by_period() {
    let raw = CompanyFactsBuilder::new()
        .usd(
            "NetIncomeLoss",
            vec![
                fact(json!(100), "10-K", 2023, "FY", None),
                fact(json!(30), "10-Q", 2023, "Q1", None),
            ],
        )
        .dei_shares(
            "EntityCommonStockSharesOutstanding",
            vec![
                fact(json!(5000), "10-K", 2023, "FY", None),
                fact(json!(4000.9), "10-Q", 2023, "Q1", None),
            ],
        )
        .to_bytes();

    let statements = extract(raw);
    assert_eq!(statements[0].shares_outstanding, Some(5000));
    assert_eq!(statements[1].shares_outstanding, Some(4000));
}

#[test]
fn test_no_metrics_means_no_statements() {
    let raw = CompanyFactsBuilder::new()
        .dei_shares(
            "EntityCommonStockSharesOutstanding",
            vec![fact(json!(5000), "10-K", 2023, "FY", None)],
        )
        .to_bytes();

    assert!(extract(raw).is_empty());
}

#[test]
fn test_each_statement_is_unique_per_period() {
    let raw = CompanyFactsBuilder::new()
        .usd(
            "NetIncomeLoss",
            vec![
                fact(json!(1), "10-K", 2023, "FY", None),
                fact(json!(2), "10-Q", 2023, "Q1", None),
            ],
        )
        .usd(
            "Assets",
            vec![
                fact(json!(3), "10-K", 2023, "FY", Some("CY2023Q4I")),
                fact(json!(4), "10-Q", 2023, "Q1", Some("CY2023Q1I")),
            ],
        )
        .to_bytes();

    let statements = extract(raw);
    assert_eq!(periods(&statements), vec![(2023, ReportType::FY), (2023, ReportType::Q1)]);
    assert_eq!(statements[0].total_assets.as_deref(), Some("3"));
    assert_eq!(statements[1].net_income.as_deref(), Some("2"));
    assert!(statements.iter().all(|s| s.stock_id == 7));
}
