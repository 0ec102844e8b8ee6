// handlers/mod.rs - request handlers for all three services
//
// Public handlers need no token. Handlers taking `Extension<AuthUser>`
// sit behind `jwt_auth_middleware` in `app.rs`.

pub mod auth;     // user service: register, login
pub mod blogs;    // blog service
pub mod comments; // comment service
pub mod health;   // every service
pub mod users;    // user service: profile read/update/delete
pub mod utils;
