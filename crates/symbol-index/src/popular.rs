//! Built-in list of well-known tickers.

use dashboard_core::Symbol;

/// Popular US listings with display names. Used both as the static candidate
/// universe and as the bias set that lifts these codes to the top of a bucket.
pub const POPULAR_SYMBOLS: &[(&str, &str)] = &[
    // Mega-cap tech
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("GOOGL", "Alphabet Inc. Class A"),
    ("GOOG", "Alphabet Inc. Class C"),
    ("AMZN", "Amazon.com Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("META", "Meta Platforms Inc."),
    ("TSLA", "Tesla Inc."),
    // Semis and software
    ("AMD", "Advanced Micro Devices Inc."),
    ("INTC", "Intel Corporation"),
    ("QCOM", "Qualcomm Inc."),
    ("AVGO", "Broadcom Inc."),
    ("TXN", "Texas Instruments Inc."),
    ("MU", "Micron Technology Inc."),
    ("AMAT", "Applied Materials Inc."),
    ("LRCX", "Lam Research Corporation"),
    ("TSM", "Taiwan Semiconductor Manufacturing"),
    ("ORCL", "Oracle Corporation"),
    ("CRM", "Salesforce Inc."),
    ("ADBE", "Adobe Inc."),
    ("IBM", "International Business Machines"),
    ("CSCO", "Cisco Systems Inc."),
    ("NOW", "ServiceNow Inc."),
    ("SHOP", "Shopify Inc."),
    ("PLTR", "Palantir Technologies Inc."),
    ("SNOW", "Snowflake Inc."),
    ("UBER", "Uber Technologies Inc."),
    ("ABNB", "Airbnb Inc."),
    ("PYPL", "PayPal Holdings Inc."),
    ("SQ", "Block Inc."),
    ("COIN", "Coinbase Global Inc."),
    ("NFLX", "Netflix Inc."),
    ("SPOT", "Spotify Technology S.A."),
    // Financials
    ("JPM", "JPMorgan Chase & Co."),
    ("BAC", "Bank of America Corporation"),
    ("WFC", "Wells Fargo & Company"),
    ("GS", "Goldman Sachs Group Inc."),
    ("MS", "Morgan Stanley"),
    ("C", "Citigroup Inc."),
    ("V", "Visa Inc."),
    ("MA", "Mastercard Inc."),
    ("AXP", "American Express Company"),
    ("BRK.B", "Berkshire Hathaway Inc. Class B"),
    ("BLK", "BlackRock Inc."),
    // Healthcare
    ("JNJ", "Johnson & Johnson"),
    ("UNH", "UnitedHealth Group Inc."),
    ("PFE", "Pfizer Inc."),
    ("MRK", "Merck & Co. Inc."),
    ("ABBV", "AbbVie Inc."),
    ("LLY", "Eli Lilly and Company"),
    ("TMO", "Thermo Fisher Scientific Inc."),
    ("AMGN", "Amgen Inc."),
    ("GILD", "Gilead Sciences Inc."),
    ("MRNA", "Moderna Inc."),
    // Consumer
    ("WMT", "Walmart Inc."),
    ("COST", "Costco Wholesale Corporation"),
    ("HD", "Home Depot Inc."),
    ("NKE", "Nike Inc."),
    ("MCD", "McDonald's Corporation"),
    ("SBUX", "Starbucks Corporation"),
    ("KO", "Coca-Cola Company"),
    ("PEP", "PepsiCo Inc."),
    ("PG", "Procter & Gamble Company"),
    ("DIS", "Walt Disney Company"),
    ("TGT", "Target Corporation"),
    // Telecom and media
    ("T", "AT&T Inc."),
    ("VZ", "Verizon Communications Inc."),
    ("TMUS", "T-Mobile US Inc."),
    ("CMCSA", "Comcast Corporation"),
    // Energy and industrials
    ("XOM", "Exxon Mobil Corporation"),
    ("CVX", "Chevron Corporation"),
    ("BA", "Boeing Company"),
    ("CAT", "Caterpillar Inc."),
    ("GE", "General Electric Company"),
    ("F", "Ford Motor Company"),
    ("GM", "General Motors Company"),
    ("RIVN", "Rivian Automotive Inc."),
    // Index ETFs
    ("SPY", "SPDR S&P 500 ETF Trust"),
    ("QQQ", "Invesco QQQ Trust"),
    ("DIA", "SPDR Dow Jones Industrial Average ETF"),
    ("IWM", "iShares Russell 2000 ETF"),
];

/// The built-in list as owned symbols.
pub fn popular_symbols() -> Vec<Symbol> {
    POPULAR_SYMBOLS
        .iter()
        .map(|(code, name)| Symbol::new(code, *name))
        .collect()
}

/// Case-insensitive membership in the popular set
pub fn is_popular(code: &str) -> bool {
    POPULAR_SYMBOLS
        .iter()
        .any(|(popular, _)| popular.eq_ignore_ascii_case(code.trim()))
}
