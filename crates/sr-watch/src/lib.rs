//! ストーリー監視モジュール
//!
//! ログイン、アカウントごとのストーリー取得、重複排除、Discord への転送を
//! 一定間隔で繰り返します。

mod driver;
mod poller;
mod relay;
mod session;

#[cfg(test)]
mod testing;

pub use driver::{CycleReport, Driver, DriverSettings, WatchContext};
pub use poller::poll_account;
pub use relay::{DeliveryOutcome, DeliveryRelay};
pub use session::SessionManager;
