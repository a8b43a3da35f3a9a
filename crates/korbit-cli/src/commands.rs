/*
[INPUT]:  Parsed subcommand and a configured client
[OUTPUT]: JSON payload of the matching endpoint
[POS]:    Command layer - maps CLI subcommands to client calls
[UPDATE]: When adding subcommands
*/

use clap::Subcommand;
use korbit_adapter::{
    CurrencyPairQuery, KorbitClient, OpenOrdersQuery, OrderbookCategory, OrderbookQuery,
    Result, TransactionPeriod, TransactionsQuery,
};
use serde_json::Value;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Latest trade price
    Ticker {
        #[arg(long)]
        detailed: bool,
        #[arg(long = "pair", value_name = "PAIR")]
        currency_pair: Option<String>,
    },
    /// Order book snapshot
    Orderbook {
        #[arg(long = "pair", value_name = "PAIR")]
        currency_pair: Option<String>,
        #[arg(long, value_enum, default_value = "all")]
        category: CategoryArg,
    },
    /// Recent public trades
    Transactions {
        #[arg(long = "pair", value_name = "PAIR")]
        currency_pair: Option<String>,
        #[arg(long, value_enum, default_value = "hour")]
        time: PeriodArg,
    },
    /// Fees and limits
    Constants,
    /// Run the token exchange and print the expiry
    Authorize,
    /// Account information
    UserInfo,
    /// Open orders
    OpenOrders {
        #[arg(long = "pair", value_name = "PAIR")]
        currency_pair: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Wallet balances
    Wallet {
        #[arg(long = "pair", value_name = "PAIR")]
        currency_pair: Option<String>,
    },
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum CategoryArg {
    All,
    Bid,
    Ask,
}

impl From<CategoryArg> for OrderbookCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::All => OrderbookCategory::All,
            CategoryArg::Bid => OrderbookCategory::Bid,
            CategoryArg::Ask => OrderbookCategory::Ask,
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum PeriodArg {
    Minute,
    Hour,
    Day,
}

impl From<PeriodArg> for TransactionPeriod {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Minute => TransactionPeriod::Minute,
            PeriodArg::Hour => TransactionPeriod::Hour,
            PeriodArg::Day => TransactionPeriod::Day,
        }
    }
}

impl Command {
    /// Subcommands that need credentials
    pub fn is_private(&self) -> bool {
        matches!(
            self,
            Command::Authorize | Command::UserInfo | Command::OpenOrders { .. } | Command::Wallet { .. }
        )
    }
}

pub async fn run(client: &KorbitClient, command: Command) -> Result<Value> {
    match command {
        Command::Ticker {
            detailed,
            currency_pair,
        } => {
            client
                .ticker(detailed, &CurrencyPairQuery { currency_pair })
                .await
        }
        Command::Orderbook {
            currency_pair,
            category,
        } => {
            let query = OrderbookQuery {
                currency_pair,
                category: category.into(),
                ..OrderbookQuery::default()
            };
            client.orderbook(&query).await
        }
        Command::Transactions {
            currency_pair,
            time,
        } => {
            let query = TransactionsQuery {
                currency_pair,
                time: time.into(),
            };
            client.transactions(&query).await
        }
        Command::Constants => client.constants().await,
        Command::Authorize => {
            let state = client.authorize().await?;
            Ok(serde_json::json!({
                "authorized": state.has_access_token(),
                "expires_at": state.expires_at,
            }))
        }
        Command::UserInfo => client.user_info().await,
        Command::OpenOrders {
            currency_pair,
            limit,
        } => {
            let query = OpenOrdersQuery {
                currency_pair,
                offset: None,
                limit,
            };
            client.open_orders(&query).await
        }
        Command::Wallet { currency_pair } => {
            client
                .wallet_status(&CurrencyPairQuery { currency_pair })
                .await
        }
    }
}
