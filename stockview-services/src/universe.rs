//! Fixed ticker universes scanned by the services

/// Low-priced, socially active names rotated through by the trending scanner
pub const PENNY_TICKERS: &[&str] = &[
    "SNDL", "SIRI", "BB", "NOK", "ZNGA", "BNGO", "SNTG", "PROG", "AVGR", "CLVS", "SENS", "NNDM",
    "OCGN", "GNUS", "XELA", "ATER", "IDEX", "HCMC", "HYLN", "BBIG", "WKHS", "CLOV", "MVIS", "SOS",
    "HUT", "RIOT", "MARA", "PLTR", "PTON", "TLRY", "NIO", "FUBO", "CANO", "GME", "AMC", "UWMC",
    "SRNE", "AGRI", "VRM", "TRKA", "MULN", "CEI", "NAKD", "SPCE", "SPRT", "KOSS", "CENN",
];

/// Large caps ranked by the top movers aggregator. Kept small for free-tier limits.
pub const LARGE_CAP_TICKERS: &[&str] = &[
    "AAPL", "MSFT", "NVDA", "TSLA", "AMZN", "META", "GOOGL", "GOOG", "UNH", "XOM", "JNJ", "JPM",
    "V", "PG", "HD", "CVX", "MA", "ABBV", "WMT", "COST", "MRK", "NFLX", "CRM", "NKE", "INTC",
    "QCOM", "AMD",
];

/// Tickers followed by the "major" news feed
pub const MAJOR_NEWS_TICKERS: &[&str] = &[
    "AAPL", "MSFT", "TSLA", "NVDA", "AMZN", "META", "GOOG", "GOOGL", "SPY", "QQQ",
];

/// Tickers followed by the "penny" news feed
pub const PENNY_NEWS_TICKERS: &[&str] = &[
    "SNDL", "SIRI", "BB", "NOK", "ZNGA", "BNGO", "SNTG", "PROG", "AVGR", "CLVS", "SENS", "NNDM",
    "OCGN", "GNUS", "XELA",
];

pub fn to_owned_list(tickers: &[&str]) -> Vec<String> {
    tickers.iter().map(|t| t.to_string()).collect()
}

/// Display name for a large-cap ticker, falling back to the ticker itself
pub fn company_name(ticker: &str) -> &str {
    match ticker {
        "AAPL" => "Apple Inc.",
        "MSFT" => "Microsoft Corporation",
        "AMZN" => "Amazon.com Inc.",
        "NVDA" => "NVIDIA Corporation",
        "GOOGL" | "GOOG" => "Alphabet Inc.",
        "TSLA" => "Tesla Inc.",
        "META" => "Meta Platforms Inc.",
        "BRK.B" => "Berkshire Hathaway",
        "UNH" => "UnitedHealth Group",
        "XOM" => "Exxon Mobil Corporation",
        "JNJ" => "Johnson & Johnson",
        "JPM" => "JPMorgan Chase & Co.",
        "V" => "Visa Inc.",
        "PG" => "Procter & Gamble",
        "AVGO" => "Broadcom Inc.",
        "HD" => "Home Depot Inc.",
        "CVX" => "Chevron Corporation",
        "MA" => "Mastercard Inc.",
        "ABBV" => "AbbVie Inc.",
        "PFE" => "Pfizer Inc.",
        "LLY" => "Eli Lilly and Company",
        "BAC" => "Bank of America",
        "KO" => "Coca-Cola Company",
        "PEP" => "PepsiCo Inc.",
        "TMO" => "Thermo Fisher Scientific",
        "WMT" => "Walmart Inc.",
        "COST" => "Costco Wholesale",
        "MRK" => "Merck & Co.",
        "ADBE" => "Adobe Inc.",
        "DIS" => "Walt Disney Company",
        "ABT" => "Abbott Laboratories",
        "ACN" => "Accenture plc",
        "DHR" => "Danaher Corporation",
        "VZ" => "Verizon Communications",
        "NFLX" => "Netflix Inc.",
        "CRM" => "Salesforce Inc.",
        "NKE" => "Nike Inc.",
        "TXN" => "Texas Instruments",
        "CMCSA" => "Comcast Corporation",
        "INTC" => "Intel Corporation",
        "NEE" => "NextEra Energy",
        "RTX" => "Raytheon Technologies",
        "QCOM" => "Qualcomm Inc.",
        "AMD" => "Advanced Micro Devices",
        "PM" => "Philip Morris International",
        "UPS" => "United Parcel Service",
        "LOW" => "Lowe's Companies",
        "T" => "AT&T Inc.",
        "BMY" => "Bristol Myers Squibb",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_name_fallback() {
        assert_eq!(company_name("NVDA"), "NVIDIA Corporation");
        assert_eq!(company_name("ZZZZ"), "ZZZZ");
    }

    #[test]
    fn test_every_large_cap_has_a_name() {
        for ticker in LARGE_CAP_TICKERS {
            assert_ne!(company_name(ticker), *ticker, "missing name for {}", ticker);
        }
    }
}
