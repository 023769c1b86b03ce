use std::path::{Path, PathBuf};

use axum_test::TestServer;
use ontograph::{
    app::AppContext,
    boot,
    config::{Config, OntologySettings},
    environment::Environment,
};

mod monitoring;
mod ontology;

pub fn fixture_document() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/instruments.owl")
}

pub fn test_config(document: PathBuf, export_dir: &Path) -> Config {
    Config {
        ontology: OntologySettings {
            document,
            export_dir: export_dir.to_path_buf(),
            ..OntologySettings::default()
        },
        ..Config::default()
    }
}

pub async fn server_for(config: Config) -> (TestServer, AppContext) {
    let ctx = boot::create_context(&Environment::Test, config)
        .await
        .expect("create context");
    let router = boot::router(&ctx).expect("build router");
    let server = TestServer::new(router).expect("start test server");
    (server, ctx)
}

pub async fn fixture_server(export_dir: &Path) -> (TestServer, AppContext) {
    server_for(test_config(fixture_document(), export_dir)).await
}
