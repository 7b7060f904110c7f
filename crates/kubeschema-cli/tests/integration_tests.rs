//! Integration tests for CLI commands

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

const FOO_CRD: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: foos.example.com
spec:
  group: example.com
  names:
    kind: Foo
    plural: foos
  scope: Namespaced
  versions:
    - name: v1
      served: true
      storage: true
      schema:
        openAPIV3Schema:
          type: object
          required: [spec]
          properties:
            spec:
              type: object
              required: [size]
              properties:
                size:
                  type: integer
"#;

const SWAGGER: &str = r#"{
  "swagger": "2.0",
  "info": {"title": "Kubernetes", "version": "v1.30.0"},
  "paths": {"/api/v1/configmaps": {}},
  "definitions": {
    "io.k8s.api.core.v1.ConfigMap": {
      "type": "object",
      "properties": {"data": {"type": "object"}}
    }
  }
}"#;

const STREAM: &str = r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
data:
  key: value
---
apiVersion: example.com/v1
kind: Foo
metadata:
  name: broken
"#;

/// Scratch directory with a private registry file
struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn registry(&self) -> PathBuf {
        self.dir.path().join("state").join("registry.json")
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write fixture");
        path
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_kubeschema"));
        cmd.arg("--registry").arg(self.registry()).args(args);
        cmd.env_remove("KUBESCHEMA_REGISTRY");
        cmd
    }

    /// Helper to run kubeschema against this workspace's registry
    fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("Failed to execute kubeschema")
    }

    fn run_with_stdin(&self, args: &[&str], stdin: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn kubeschema");
        child
            .stdin
            .take()
            .expect("stdin")
            .write_all(stdin.as_bytes())
            .expect("Failed to write stdin");
        child.wait_with_output().expect("Failed to wait for kubeschema")
    }

    fn load_crds(&self) {
        let crd = self.file("crds.yaml", FOO_CRD);
        let output = self.run(&["crd", "load", path_str(&crd)]);
        assert!(output.status.success(), "crd load failed: {}", stderr(&output));
    }

    fn load_openapi(&self, cluster: &str, version: &str) {
        let spec = self.file("swagger.json", SWAGGER);
        let output = self.run(&[
            "openapi",
            "load",
            path_str(&spec),
            "--cluster",
            cluster,
            "--version",
            version,
        ]);
        assert!(output.status.success(), "openapi load failed: {}", stderr(&output));
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("Output should be valid JSON")
}

mod crd_command {
    use super::*;

    #[test]
    fn test_load_persists_registry() {
        let ws = Workspace::new();
        ws.load_crds();

        assert!(ws.registry().exists());
        let stored: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(ws.registry()).unwrap()).unwrap();
        assert_eq!(stored["crds"][0]["metadata"]["name"], "foos.example.com");
        assert_eq!(stored["openapis"], serde_json::json!([]));
    }

    #[test]
    fn test_load_without_crds_fails() {
        let ws = Workspace::new();
        let file = ws.file("cm.yaml", "apiVersion: v1\nkind: ConfigMap\n");

        let output = ws.run(&["crd", "load", path_str(&file)]);
        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("No CRDs found"));
        assert!(!ws.registry().exists());
    }

    #[test]
    fn test_preview_does_not_write() {
        let ws = Workspace::new();
        let file = ws.file("crds.yaml", FOO_CRD);

        let output = ws.run(&["crd", "preview", path_str(&file)]);
        assert!(output.status.success());
        assert!(stdout(&output).contains("Found 1 CRD(s)"));
        assert!(stdout(&output).contains("foos.example.com"));
        assert!(!ws.registry().exists());
    }

    #[test]
    fn test_list_and_remove() {
        let ws = Workspace::new();
        ws.load_crds();

        let listed = json(&ws.run(&["crd", "list", "--json"]));
        assert_eq!(listed[0]["kind"], "Foo");
        assert_eq!(listed[0]["versions"], serde_json::json!(["v1"]));

        let output = ws.run(&["crd", "remove", "3"]);
        assert_eq!(output.status.code(), Some(64));

        let output = ws.run(&["crd", "remove", "0"]);
        assert!(output.status.success());
        assert_eq!(json(&ws.run(&["crd", "list", "--json"])), serde_json::json!([]));
    }
}

mod openapi_command {
    use super::*;

    #[test]
    fn test_load_upserts_by_cluster_and_version() {
        let ws = Workspace::new();
        ws.load_openapi("prod", "1.30");
        ws.load_openapi("prod", "1.30");
        ws.load_openapi("dev", "1.30");

        let listed = json(&ws.run(&["openapi", "list", "--json"]));
        let entries = listed.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["cluster"], "prod");
        assert_eq!(entries[0]["apiVersion"], "v1.30.0");
        assert_eq!(entries[0]["openapiVersion"], "2.0");
        assert_eq!(entries[0]["paths"], 1);
        assert_eq!(entries[1]["cluster"], "dev");
    }

    #[test]
    fn test_load_stores_every_document_in_file() {
        let ws = Workspace::new();
        let multi = ws.file(
            "multi.yaml",
            "openapi: 3.0.0\ninfo:\n  title: core\npaths: {}\n---\nswagger: '2.0'\ninfo:\n  title: apps\ndefinitions: {}\n",
        );
        let args = ["openapi", "load", path_str(&multi), "--cluster", "prod", "--version", "1.30"];

        let output = ws.run(&args);
        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let listed = json(&ws.run(&["openapi", "list", "--json"]));
        assert_eq!(listed.as_array().unwrap().len(), 2);
        assert_eq!(listed[0]["openapiVersion"], "3.0.0");
        assert_eq!(listed[1]["openapiVersion"], "2.0");

        ws.load_openapi("dev", "1.30");
        assert!(ws.run(&args).status.success());
        let listed = json(&ws.run(&["openapi", "list", "--json"]));
        assert_eq!(listed.as_array().unwrap().len(), 3);
        assert_eq!(listed[0]["cluster"], "dev");
    }

    #[test]
    fn test_load_requires_cluster_and_version() {
        let ws = Workspace::new();
        let spec = ws.file("swagger.json", SWAGGER);

        let output = ws.run(&["openapi", "load", path_str(&spec), "--cluster", " ", "--version", "1.30"]);
        assert_eq!(output.status.code(), Some(64));
        assert!(!ws.registry().exists());
    }

    #[test]
    fn test_load_rejects_non_openapi() {
        let ws = Workspace::new();
        let file = ws.file("crds.yaml", FOO_CRD);

        let output = ws.run(&["openapi", "load", path_str(&file), "--cluster", "c", "--version", "v"]);
        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("No OpenAPI document found"));
    }

    #[test]
    fn test_preview_json() {
        let ws = Workspace::new();
        let spec = ws.file("swagger.json", SWAGGER);

        let summary = json(&ws.run(&["openapi", "preview", path_str(&spec), "--json"]));
        assert_eq!(
            summary,
            serde_json::json!({"hasOpenAPI": true, "openapiVersion": "2.0", "crdCount": 0})
        );
    }
}

mod validate_command {
    use super::*;

    #[test]
    fn test_validate_reports_crd_issue() {
        let ws = Workspace::new();
        ws.load_crds();
        let manifests = ws.file("app.yaml", STREAM);

        let output = ws.run(&["validate", path_str(&manifests), "--json"]);
        assert_eq!(output.status.code(), Some(2));

        let report = json(&output);
        assert_eq!(report["valid"], false);
        assert_eq!(
            report["issues"],
            serde_json::json!([{
                "ruleId": "schema-crd",
                "severity": "error",
                "message": "Missing required field: spec",
                "path": "spec",
                "docIndex": 1
            }])
        );
    }

    #[test]
    fn test_validate_clean_stream() {
        let ws = Workspace::new();
        ws.load_crds();
        let manifests = ws.file(
            "ok.yaml",
            "apiVersion: example.com/v1\nkind: Foo\nspec:\n  size: 2\n",
        );

        let output = ws.run(&["validate", path_str(&manifests)]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(stdout(&output).contains("No issues found"));
    }

    #[test]
    fn test_validate_parse_error_from_stdin() {
        let ws = Workspace::new();
        ws.load_crds();

        let output = ws.run_with_stdin(&["validate", "-", "--json"], "a: [1, 2\nb: {");
        assert_eq!(output.status.code(), Some(2));

        let report = json(&output);
        assert_eq!(report["source"], "stdin");
        assert_eq!(report["issues"][0]["ruleId"], "parse-error");
        assert!(report["issues"][0].get("docIndex").is_none());
    }

    #[test]
    fn test_validate_missing_file() {
        let ws = Workspace::new();
        let output = ws.run(&["validate", "does-not-exist.yaml"]);
        assert_eq!(output.status.code(), Some(5));
    }
}

mod check_command {
    use super::*;

    #[test]
    fn test_check_openapi_match() {
        let ws = Workspace::new();
        ws.load_openapi("prod", "1.30");
        let resource = ws.file("cm.json", r#"{"apiVersion": "v1", "kind": "ConfigMap", "data": "oops"}"#);

        let output = ws.run(&["check", path_str(&resource), "--json"]);
        assert_eq!(output.status.code(), Some(2));

        let result = json(&output);
        assert_eq!(result["ok"], false);
        assert_eq!(result["matchedBy"], "openapi");
        assert_eq!(result["errors"][0]["path"], "data");
    }

    #[test]
    fn test_check_reports_no_match() {
        let ws = Workspace::new();
        ws.load_crds();

        let output = ws.run_with_stdin(&["check", "-", "--json"], "apiVersion: v1\nkind: Secret\n");
        let result = json(&output);
        assert_eq!(result["matchedBy"], "none");
        assert_eq!(result["errors"][0]["message"], "no matching schema found");
    }

    #[test]
    fn test_check_valid_resource() {
        let ws = Workspace::new();
        ws.load_crds();
        let resource = ws.file("foo.yaml", "apiVersion: example.com/v1\nkind: Foo\nspec:\n  size: 1\n");

        let output = ws.run(&["check", path_str(&resource)]);
        assert!(output.status.success());
        assert!(stdout(&output).contains("Resource is valid"));
    }
}

mod summary_command {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let ws = Workspace::new();
        ws.load_crds();
        ws.load_openapi("prod", "1.30");

        let summary = json(&ws.run(&["summary", "--json"]));
        assert_eq!(
            summary,
            serde_json::json!({"crdCount": 1, "openapiCount": 1, "crdVersions": 1, "openapiSchemas": 1})
        );
    }

    #[test]
    fn test_registry_from_env() {
        let ws = Workspace::new();
        let crd = ws.file("crds.yaml", FOO_CRD);
        let registry = ws.dir.path().join("env-registry.json");

        let output = Command::new(env!("CARGO_BIN_EXE_kubeschema"))
            .args(["crd", "load", path_str(&crd)])
            .env("KUBESCHEMA_REGISTRY", &registry)
            .output()
            .expect("Failed to execute kubeschema");
        assert!(output.status.success());
        assert!(registry.exists());
    }
}

#[test]
fn test_unknown_command_is_usage_error() {
    let ws = Workspace::new();
    let output = ws.run(&["frobnicate"]);
    assert_eq!(output.status.code(), Some(64));
}
