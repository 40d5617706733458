//! # Introduction
//! Lantern turns a contract ABI into a typed, callable surface: methods,
//! constants and events, backed by any transport implementing
//! [`Adapter`](adapter::Adapter).
//!
//! ## Features
//! * ABI parsing with overloads and nested tuple types
//! * Per type validation and conversion of call arguments and results
//! * Event subscriptions demultiplexed by signature hash into typed records
//! * Call hooks shared by every overload of a method
//! * Loaders for plain JSON and truffle build artifacts
//!
//! ## Getting started
//! ```rust
//! use lantern::codec::{convert_input, Args};
//! use lantern::loader::ContractData;
//! use lantern::parser::{AbiParser, Parser};
//! use serde_json::json;
//!
//! let data = ContractData::from_abi(json!([{
//!     "type": "function",
//!     "name": "sendCoin",
//!     "inputs": [
//!         {"name": "receiver", "type": "address"},
//!         {"name": "amount", "type": "uint256"}
//!     ],
//!     "outputs": [{"name": "sufficient", "type": "bool"}],
//!     "stateMutability": "nonpayable"
//! }]));
//!
//! let interface = AbiParser::new().parse(&data).unwrap();
//! let send_coin = interface.method("sendCoin").unwrap().first().unwrap();
//! assert_eq!(send_coin.signature, "sendCoin(address,uint256)");
//!
//! let args = Args::Positional(vec![
//!     json!("0x7da82c7ab4771ff031b66538d2fb9b0b047f6cf9"),
//!     json!("0x10"),
//! ]);
//! let wire = convert_input(&send_coin.input, &args).unwrap();
//! assert_eq!(wire[1], json!("16"));
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;

pub mod abi;
pub mod adapter;
mod address;
pub mod call;
pub mod codec;
pub mod config;
pub mod contract;
pub mod error;
pub mod event;
pub mod hooks;
pub mod loader;
pub mod method;
pub mod parser;
pub mod registry;
pub mod spec;
pub mod types;
pub mod utils;

pub use address::Address;
pub use contract::{Contract, ContractBuilder};
pub use error::Error;
pub use event::{Event, EventLog, TypedEvent};
pub use method::{Method, MethodKind};
pub use spec::{ContractInterface, EventSpec, FunctionSpec, OverloadSet, ParamSpec};
pub use types::ParamType;

pub use num256::Uint256;
