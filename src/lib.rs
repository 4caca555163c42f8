// Move selection core: evaluation, quiescence, alpha-beta and the cache
pub mod board;
pub mod config;
pub mod search;
pub mod uci;
