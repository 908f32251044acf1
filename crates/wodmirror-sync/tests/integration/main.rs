//! Integration tests for wodmirror-sync
//!
//! Drives the SyncEngine against an in-memory feed and a real JSON store in
//! a temporary directory.


mod test_engine;
