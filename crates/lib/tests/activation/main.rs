mod common;
mod ledger_tests;
mod resolution_tests;
mod roundtrip_tests;
