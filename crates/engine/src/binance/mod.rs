pub mod rest;

pub use rest::BinanceCandles;
