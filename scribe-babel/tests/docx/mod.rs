mod import;
mod roundtrip;
