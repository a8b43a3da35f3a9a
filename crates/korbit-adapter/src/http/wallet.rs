/*
[INPUT]:  Currencies, addresses and withdrawal amounts
[OUTPUT]: Wallet balances, deposit addresses and coin withdrawal state
[POS]:    HTTP layer - coin wallet endpoints (require auth)
[UPDATE]: When wallet endpoints change
*/

use serde_json::Value;

use crate::http::{KorbitClient, Result};
use crate::types::{
    CancelWithdrawalRequest, CoinAddressRequest, CoinWithdrawalRequest, CurrencyPairQuery,
    CurrencyQuery,
};

impl KorbitClient {
    /// Balances, pending orders and deposit addresses
    ///
    /// GET /user/wallet
    pub async fn wallet_status(&self, query: &CurrencyPairQuery) -> Result<Value> {
        self.private_get("/user/wallet", query).await
    }

    /// POST /user/coins/address/assign
    pub async fn assign_coin_address(&self, req: &CoinAddressRequest) -> Result<Value> {
        self.private_post("/user/coins/address/assign", req).await
    }

    /// POST /user/coins/out
    pub async fn request_coin_withdrawal(&self, req: &CoinWithdrawalRequest) -> Result<Value> {
        self.private_post("/user/coins/out", req).await
    }

    /// GET /user/coins/status
    pub async fn coin_withdrawal_status(&self, query: &CurrencyQuery) -> Result<Value> {
        self.private_get("/user/coins/status", query).await
    }

    /// POST /user/coins/out/cancel
    pub async fn cancel_coin_withdrawal(&self, req: &CancelWithdrawalRequest) -> Result<Value> {
        self.private_post("/user/coins/out/cancel", req).await
    }
}
