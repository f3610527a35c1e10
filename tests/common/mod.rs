#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use foundry::spec::{load_spec, parse_spec, SpecFormat, Specification};
use std::path::PathBuf;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// The shared mid-size specification
pub fn shop_spec() -> Specification {
    load_spec(&fixture_path("shop.yaml")).expect("load shop fixture")
}

pub fn yaml_spec(content: &str) -> Specification {
    parse_spec(content, SpecFormat::Yaml).expect("parse inline spec")
}
