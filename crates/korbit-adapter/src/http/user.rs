/*
[INPUT]:  Order parameters and bearer authentication
[OUTPUT]: User account data and order confirmations
[POS]:    HTTP layer - user and order endpoints (require auth)
[UPDATE]: When adding new user endpoints or changing order parameters
*/

use serde_json::Value;

use crate::http::{KorbitClient, Result};
use crate::types::{CancelOrderRequest, OpenOrdersQuery, OrderRequest, TransactionHistoryQuery};

impl KorbitClient {
    /// GET /user/info
    pub async fn user_info(&self) -> Result<Value> {
        self.private_get("/user/info", &()).await
    }

    /// Place a buy order
    ///
    /// POST /user/orders/buy
    pub async fn bid_order(&self, order: &OrderRequest) -> Result<Value> {
        self.private_post("/user/orders/buy", order).await
    }

    /// Place a sell order
    ///
    /// POST /user/orders/sell
    pub async fn ask_order(&self, order: &OrderRequest) -> Result<Value> {
        self.private_post("/user/orders/sell", order).await
    }

    /// POST /user/orders/cancel
    pub async fn cancel_order(&self, req: &CancelOrderRequest) -> Result<Value> {
        self.private_post("/user/orders/cancel", req).await
    }

    /// GET /user/orders/open
    pub async fn open_orders(&self, query: &OpenOrdersQuery) -> Result<Value> {
        self.private_get("/user/orders/open", query).await
    }

    /// Filled orders, deposits and withdrawals
    ///
    /// GET /user/transactions
    pub async fn transaction_history(&self, query: &TransactionHistoryQuery) -> Result<Value> {
        self.private_get("/user/transactions", query).await
    }
}
