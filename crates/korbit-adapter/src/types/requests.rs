/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed request parameters, flattened into query or form fields
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{OrderType, OrderbookCategory, TransactionPeriod};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyPairQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_pair: Option<String>,
}

impl CurrencyPairQuery {
    pub fn new(currency_pair: Option<&str>) -> Self {
        Self {
            currency_pair: currency_pair.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderbookQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_pair: Option<String>,
    pub group: bool,
    pub category: OrderbookCategory,
}

impl Default for OrderbookQuery {
    fn default() -> Self {
        Self {
            currency_pair: None,
            group: true,
            category: OrderbookCategory::All,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_pair: Option<String>,
    pub time: TransactionPeriod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub currency_pair: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coin_amount: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiat_amount: Option<Decimal>,
}

impl OrderRequest {
    pub fn limit(currency_pair: impl Into<String>, price: Decimal, coin_amount: Decimal) -> Self {
        Self {
            currency_pair: currency_pair.into(),
            order_type: OrderType::Limit,
            price: Some(price),
            coin_amount: Some(coin_amount),
            fiat_amount: None,
        }
    }

    /// Market buy spending `fiat_amount`
    pub fn market_buy(currency_pair: impl Into<String>, fiat_amount: Decimal) -> Self {
        Self {
            currency_pair: currency_pair.into(),
            order_type: OrderType::Market,
            price: None,
            coin_amount: None,
            fiat_amount: Some(fiat_amount),
        }
    }

    /// Market sell of `coin_amount`
    pub fn market_sell(currency_pair: impl Into<String>, coin_amount: Decimal) -> Self {
        Self {
            currency_pair: currency_pair.into(),
            order_type: OrderType::Market,
            price: None,
            coin_amount: Some(coin_amount),
            fiat_amount: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrderRequest {
    pub currency_pair: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenOrdersQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_pair: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHistoryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_pair: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccountRequest {
    pub bank: String,
    pub account: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiatWithdrawalRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// Cancels a pending withdrawal; `currency` is only sent for coins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelWithdrawalRequest {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinAddressRequest {
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinWithdrawalRequest {
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub address: String,
}
