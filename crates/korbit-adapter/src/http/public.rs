/*
[INPUT]:  Currency pairs and query parameters
[OUTPUT]: Market data (ticker, orderbook, transactions, constants)
[POS]:    HTTP layer - public market data endpoints (no auth required)
[UPDATE]: When adding new public endpoints or changing query defaults
*/

use serde_json::Value;

use crate::http::{KorbitClient, Result};
use crate::types::{CurrencyPairQuery, OrderbookQuery, TransactionsQuery};

impl KorbitClient {
    /// Latest price, or the detailed ticker with bid/ask/volume
    ///
    /// GET /ticker | /ticker/detailed
    pub async fn ticker(&self, detailed: bool, query: &CurrencyPairQuery) -> Result<Value> {
        let path = if detailed { "/ticker/detailed" } else { "/ticker" };
        self.public_request(path, query).await
    }

    /// GET /orderbook?group={group}&category={category}
    pub async fn orderbook(&self, query: &OrderbookQuery) -> Result<Value> {
        self.public_request("/orderbook", query).await
    }

    /// GET /transactions?time={time}
    pub async fn transactions(&self, query: &TransactionsQuery) -> Result<Value> {
        self.public_request("/transactions", query).await
    }

    /// Fee schedule and limits
    ///
    /// GET /constants
    pub async fn constants(&self) -> Result<Value> {
        self.public_request("/constants", &()).await
    }
}
