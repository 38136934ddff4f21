//! RPC front end
//!
//! A unary `PhotoService` with `Save`, `Find` and `Delete` methods. Each call
//! is a `POST /rpc/PhotoService/{method}` whose body is the bincode encoded
//! request message; the reply is a bincode encoded [`message::RpcResponse`].

pub mod handlers;
pub mod message;

use actix_web::web;

use handlers::rpc_handler;

/// Mount the RPC endpoint
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/rpc/PhotoService/{method}", web::post().to(rpc_handler));
}
