use cucumber::World;
use reqdoc::config::Config;

#[derive(Debug, Default, World)]
pub struct ReqdocWorld {
    pub tracker: tracker::InMemoryTracker,
    pub workspace: Option<tempfile::TempDir>,
    pub captured_output: Vec<u8>,
    pub run_result: Option<Result<(), anyhow::Error>>,
    pub generated_documents: Vec<String>,
}

impl ReqdocWorld {
    pub fn config(&mut self) -> Config {
        let workspace = self
            .workspace
            .get_or_insert_with(|| tempfile::tempdir().expect("Failed to create temp dir"));
        let mut config = Config::new("test-token", "owner/repo");
        config.output = workspace.path().join("docs").join("requirements.md");
        config
    }

    pub fn document(&mut self) -> String {
        let path = self.config().output;
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read document {:?}: {}", path, e))
    }
}

#[tokio::main]
async fn main() {
    ReqdocWorld::run("features").await;
}

mod tracker;
