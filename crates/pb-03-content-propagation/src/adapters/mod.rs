pub mod jsonrpc_endpoint;

pub use jsonrpc_endpoint::JsonRpcEndpoint;
