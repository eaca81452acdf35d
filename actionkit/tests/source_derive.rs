//! Tests for #[derive(Source)] macro

use actionkit::Source;
use actionkit::Source as SourceMacro;

#[test]
fn test_enum_type_names() {
    #[derive(SourceMacro)]
    #[allow(dead_code)]
    enum Resource {
        WebApp { name: String },
        FunctionApp(String),
        ContainerRegistry,
    }

    assert_eq!(Resource::WebApp { name: "a".into() }.type_name(), "web_app");
    assert_eq!(Resource::FunctionApp("f".into()).type_name(), "function_app");
    assert_eq!(Resource::ContainerRegistry.type_name(), "container_registry");
    assert_eq!(
        Resource::TYPE_NAMES,
        &["web_app", "function_app", "container_registry"]
    );
}

#[test]
fn test_variant_predicates() {
    #[derive(SourceMacro)]
    #[allow(dead_code)]
    enum Resource {
        WebApp { name: String },
        FunctionApp(String),
    }

    let app = Resource::WebApp { name: "a".into() };
    assert!(app.is_web_app());
    assert!(!app.is_function_app());
    assert!(Resource::FunctionApp("f".into()).is_function_app());
}

#[test]
fn test_linked_variant() {
    #[derive(SourceMacro)]
    #[allow(dead_code)]
    enum Resource {
        StorageAccount(String),
        #[source(linked)]
        LinkedStorageAccount(String),
    }

    assert!(!Resource::StorageAccount("s".into()).is_linked());
    assert!(Resource::LinkedStorageAccount("s".into()).is_linked());
}

#[test]
fn test_rename_variant() {
    #[derive(SourceMacro)]
    #[allow(dead_code)]
    enum Node {
        #[source(rename = "storage", linked)]
        LinkedStorageAccount(String),
        Vm,
    }

    assert_eq!(Node::LinkedStorageAccount("s".into()).type_name(), "storage");
    assert!(Node::LinkedStorageAccount("s".into()).is_linked());
    assert!(Node::LinkedStorageAccount("s".into()).is_linked_storage_account());
    assert_eq!(Node::TYPE_NAMES, &["storage", "vm"]);
}

#[test]
fn test_struct_source() {
    #[derive(SourceMacro)]
    #[allow(dead_code)]
    struct SqlServer {
        name: String,
    }

    #[derive(SourceMacro)]
    #[source(linked, rename = "cosmos")]
    struct LinkedCosmosAccount;

    let server = SqlServer { name: "db".into() };
    assert_eq!(server.type_name(), "sql_server");
    assert!(!server.is_linked());
    assert_eq!(LinkedCosmosAccount.type_name(), "cosmos");
    assert!(LinkedCosmosAccount.is_linked());
}

#[test]
fn test_container_linked_enum() {
    #[derive(SourceMacro)]
    #[source(linked)]
    #[allow(dead_code)]
    enum External {
        Account(String),
        Database(String),
    }

    assert!(External::Account("a".into()).is_linked());
    assert!(External::Database("d".into()).is_linked());
}

#[test]
fn test_generic_source() {
    #[derive(SourceMacro)]
    #[allow(dead_code)]
    enum Wrapped<T: Send + Sync + 'static> {
        Item(T),
        Empty,
    }

    assert_eq!(Wrapped::Item(3u8).type_name(), "item");
    assert!(Wrapped::<u8>::Empty.is_empty());
}
