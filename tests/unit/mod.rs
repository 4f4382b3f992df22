//! Unit test modules.

mod codec_test;
