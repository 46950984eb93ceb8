//! Symbol search and listing types

use serde::{Deserialize, Serialize};

/// One hit from a symbol search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolMatch {
    pub symbol: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub display_symbol: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// A symbol listed on an exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedSymbol {
    pub symbol: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub display_symbol: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Security types kept by [`filter_listed_symbols`]
const TRADABLE_TYPES: [&str; 5] = ["common stock", "adr", "etp", "etf", "eqs"];

/// Keep tradable equity-like symbols with a description, dedup by symbol and
/// sort alphabetically.
pub fn filter_listed_symbols(symbols: Vec<ListedSymbol>) -> Vec<ListedSymbol> {
    let mut kept: Vec<ListedSymbol> = symbols
        .into_iter()
        .filter(|s| !s.symbol.is_empty() && !s.description.is_empty())
        .filter(|s| {
            let kind = s.kind.as_deref().unwrap_or_default().to_lowercase();
            TRADABLE_TYPES.iter().any(|t| kind.contains(t))
        })
        .collect();

    // Stable sort keeps the first listing of a duplicated symbol
    kept.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    kept.dedup_by(|a, b| a.symbol == b.symbol);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listed(symbol: &str, description: &str, kind: &str) -> ListedSymbol {
        ListedSymbol {
            symbol: symbol.to_string(),
            description: description.to_string(),
            display_symbol: None,
            kind: Some(kind.to_string()),
            currency: Some("USD".to_string()),
        }
    }

    #[test]
    fn test_filter_listed_symbols() {
        let symbols = vec![
            listed("MSFT", "MICROSOFT CORP", "Common Stock"),
            listed("AAPL", "APPLE INC", "Common Stock"),
            listed("AAPL", "APPLE INC DUP", "Common Stock"),
            listed("WARR", "SOME WARRANT", "Warrant"),
            listed("SPY", "SPDR S&P 500", "ETP"),
            listed("NODESC", "", "Common Stock"),
        ];

        let kept = filter_listed_symbols(symbols);
        let tickers: Vec<&str> = kept.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(tickers, vec!["AAPL", "MSFT", "SPY"]);
        assert_eq!(kept[0].description, "APPLE INC");
    }

    #[test]
    fn test_search_match_deserializes_type() {
        let json = r#"{"description":"APPLE INC","displaySymbol":"AAPL","symbol":"AAPL","type":"Common Stock"}"#;
        let hit: SymbolMatch = serde_json::from_str(json).unwrap();
        assert_eq!(hit.kind.as_deref(), Some("Common Stock"));
        assert_eq!(hit.display_symbol.as_deref(), Some("AAPL"));
    }
}
