//! API clients for stock data providers

pub mod yahoo;

pub use yahoo::{
    Figure, InsiderTransaction, NewsItem, Quote, Statement, YahooFinanceClient, normalize_symbol,
};
