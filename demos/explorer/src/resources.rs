//! Resources shown in the explorer tree

use actionkit::Source;

#[derive(Debug, Clone, PartialEq, Eq, Source)]
pub enum Resource {
    WebApp { name: String, running: bool },
    FunctionApp { name: String, running: bool },
    ContainerRegistry { name: String, admin_enabled: bool },
    #[source(linked)]
    LinkedStorageAccount { name: String, pinned: bool },
}

impl Resource {
    pub fn name(&self) -> &str {
        match self {
            Resource::WebApp { name, .. }
            | Resource::FunctionApp { name, .. }
            | Resource::ContainerRegistry { name, .. }
            | Resource::LinkedStorageAccount { name, .. } => name,
        }
    }

    /// Whether the resource is an app that can be started and stopped
    pub fn is_app(&self) -> bool {
        self.is_web_app() || self.is_function_app()
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self,
            Resource::WebApp { running: true, .. } | Resource::FunctionApp { running: true, .. }
        )
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self, Resource::LinkedStorageAccount { pinned: true, .. })
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Resource::WebApp { .. } => "Web App",
            Resource::FunctionApp { .. } => "Function App",
            Resource::ContainerRegistry { .. } => "Container Registry",
            Resource::LinkedStorageAccount { .. } => "Storage Account (linked)",
        }
    }
}

/// The tree the explorer starts with
pub fn sample_resources() -> Vec<Resource> {
    vec![
        Resource::WebApp {
            name: "api-prod".into(),
            running: true,
        },
        Resource::WebApp {
            name: "web-staging".into(),
            running: false,
        },
        Resource::FunctionApp {
            name: "nightly-jobs".into(),
            running: true,
        },
        Resource::ContainerRegistry {
            name: "images".into(),
            admin_enabled: false,
        },
        Resource::LinkedStorageAccount {
            name: "shared-assets".into(),
            pinned: false,
        },
    ]
}
