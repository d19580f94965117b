mod ticker_fetch_integration;
