pub mod dispatch;
pub mod graph;
pub mod ingest;
pub mod init;
pub mod schema;
pub mod search;
pub mod shared;
