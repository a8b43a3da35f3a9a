/*
[INPUT]:  Bank account details and withdrawal amounts
[OUTPUT]: Fiat deposit address and withdrawal state
[POS]:    HTTP layer - fiat (KRW) endpoints (require auth)
[UPDATE]: When fiat endpoints change
*/

use serde_json::Value;

use crate::http::{KorbitClient, Result};
use crate::types::{BankAccountRequest, CancelWithdrawalRequest, FiatWithdrawalRequest};

impl KorbitClient {
    /// Assign a virtual bank account for KRW deposits
    ///
    /// POST /user/fiats/address/assign
    pub async fn assign_virtual_bank(&self) -> Result<Value> {
        self.private_post("/user/fiats/address/assign", &()).await
    }

    /// POST /user/fiats/address/register
    pub async fn register_bank_account(&self, req: &BankAccountRequest) -> Result<Value> {
        self.private_post("/user/fiats/address/register", req).await
    }

    /// POST /user/fiats/out
    pub async fn request_fiat_withdrawal(&self, req: &FiatWithdrawalRequest) -> Result<Value> {
        self.private_post("/user/fiats/out", req).await
    }

    /// GET /user/fiats/status
    pub async fn fiat_withdrawal_status(&self) -> Result<Value> {
        self.private_get("/user/fiats/status", &()).await
    }

    /// POST /user/fiats/out/cancel
    pub async fn cancel_fiat_withdrawal(&self, req: &CancelWithdrawalRequest) -> Result<Value> {
        self.private_post("/user/fiats/out/cancel", req).await
    }
}
