//! Project detection from `package.json` and t3-env schema files.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::framework::Framework;
use crate::t3env::T3EnvSchema;

/// Dependency names that identify a framework, checked in order.
const FRAMEWORK_DEPENDENCIES: &[(&str, Framework)] = &[
    ("@sveltejs/kit", Framework::SvelteKit),
    ("next", Framework::NextJs),
    ("@angular/core", Framework::Angular),
];

const T3_ENV_DEPENDENCIES: &[&str] = &["@t3-oss/env-nextjs", "@t3-oss/env-core"];

const DEPENDENCY_SECTIONS: &[&str] = &["dependencies", "devDependencies", "peerDependencies"];

static SCHEMA_SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(server|client)\s*:\s*\{").expect("valid regex"));
static SCHEMA_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*["']?([A-Za-z_][A-Za-z0-9_]*)["']?\s*:"#).expect("valid regex")
});

/// What a project is built with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    /// Detected framework.
    pub framework: Framework,
    /// `true` when a t3-env package is a dependency.
    pub uses_t3_env: bool,
}

fn has_dependency(manifest: &Value, name: &str) -> bool {
    DEPENDENCY_SECTIONS
        .iter()
        .filter_map(|section| manifest.get(section).and_then(Value::as_object))
        .any(|deps| deps.contains_key(name))
}

/// Reads `package.json` text and decides the framework.
///
/// Text that is not a JSON object yields [`ProjectInfo::default`].
///
/// # Examples
///
/// ```rust
/// use dotenv_diff::detect::detect_project;
/// use dotenv_diff::framework::Framework;
///
/// let info = detect_project(r#"{"dependencies": {"next": "14.2.0"}}"#);
/// assert_eq!(info.framework, Framework::NextJs);
/// assert!(!info.uses_t3_env);
/// ```
pub fn detect_project(package_json: &str) -> ProjectInfo {
    let manifest: Value = match serde_json::from_str(package_json) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("package.json is not valid JSON: {}", e);
            return ProjectInfo::default();
        }
    };

    let framework = FRAMEWORK_DEPENDENCIES
        .iter()
        .find(|(name, _)| has_dependency(&manifest, name))
        .map(|(_, framework)| *framework)
        .unwrap_or_default();
    let uses_t3_env = T3_ENV_DEPENDENCIES
        .iter()
        .any(|name| has_dependency(&manifest, name));

    ProjectInfo {
        framework,
        uses_t3_env,
    }
}

/// Returns the text between the brace opening at `open` and its match.
fn braced_block(content: &str, open: usize) -> Option<&str> {
    let mut depth = 0usize;
    for (i, c) in content[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&content[open + 1..open + i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Top-level keys of an object literal body, skipping nested objects.
fn top_level_keys(block: &str) -> Vec<String> {
    let mut flat = String::with_capacity(block.len());
    let mut depth = 0usize;
    for c in block.chars() {
        match c {
            '{' | '(' | '[' => depth += 1,
            '}' | ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => flat.push(c),
            _ => {}
        }
        if c == ',' && depth == 0 {
            flat.push('\n');
        }
    }
    SCHEMA_KEY
        .captures_iter(&flat)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Extracts the `server` and `client` variable names from a t3-env
/// `createEnv({ ... })` schema file.
///
/// Only the first `server: {}` and `client: {}` blocks count. Anything that
/// cannot be parsed is left out.
///
/// # Examples
///
/// ```rust
/// use dotenv_diff::detect::parse_t3_env_schema;
///
/// let schema = parse_t3_env_schema(
///     r#"export const env = createEnv({
///   server: { DATABASE_URL: z.string().url(), SECRET: z.string() },
///   client: { NEXT_PUBLIC_API: z.string() },
/// });"#,
/// );
/// assert_eq!(schema.server, vec!["DATABASE_URL", "SECRET"]);
/// assert_eq!(schema.client, vec!["NEXT_PUBLIC_API"]);
/// ```
pub fn parse_t3_env_schema(content: &str) -> T3EnvSchema {
    let mut schema = T3EnvSchema::default();
    for caps in SCHEMA_SECTION.captures_iter(content) {
        let (Some(section), Some(whole)) = (caps.get(1), caps.get(0)) else {
            continue;
        };
        let target = match section.as_str() {
            "server" if schema.server.is_empty() => &mut schema.server,
            "client" if schema.client.is_empty() => &mut schema.client,
            _ => continue,
        };
        if let Some(block) = braced_block(content, whole.end() - 1) {
            *target = top_level_keys(block);
        }
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_sveltekit_from_dev_dependencies() {
        let info = detect_project(r#"{"devDependencies": {"@sveltejs/kit": "^2.0.0"}}"#);
        assert_eq!(info.framework, Framework::SvelteKit);
    }

    #[test]
    fn test_detect_angular() {
        let info = detect_project(r#"{"dependencies": {"@angular/core": "^17.0.0", "rxjs": "7"}}"#);
        assert_eq!(info.framework, Framework::Angular);
    }

    #[test]
    fn test_detect_t3_env() {
        let info = detect_project(
            r#"{"dependencies": {"next": "14", "@t3-oss/env-nextjs": "0.7"}}"#,
        );
        assert_eq!(info.framework, Framework::NextJs);
        assert!(info.uses_t3_env);
        let info = detect_project(r#"{"dependencies": {"@t3-oss/env-core": "0.7"}}"#);
        assert_eq!(info.framework, Framework::Unknown);
        assert!(info.uses_t3_env);
    }

    #[test]
    fn test_invalid_manifest_is_unknown() {
        assert_eq!(detect_project("not json"), ProjectInfo::default());
        assert_eq!(detect_project("[]"), ProjectInfo::default());
        assert_eq!(detect_project(""), ProjectInfo::default());
    }

    #[test]
    fn test_parse_schema_multiline_with_nested_calls() {
        let src = r#"
import { createEnv } from "@t3-oss/env-nextjs";
import { z } from "zod";

export const env = createEnv({
  server: {
    DATABASE_URL: z.string().url(),
    NODE_ENV: z.enum(["development", "test", "production"]),
    REDIS: z.object({ host: z.string() }).optional(),
  },
  client: {
    NEXT_PUBLIC_CLIENTVAR: z.string(),
  },
  runtimeEnv: {
    DATABASE_URL: process.env.DATABASE_URL,
  },
});
"#;
        let schema = parse_t3_env_schema(src);
        assert_eq!(schema.server, vec!["DATABASE_URL", "NODE_ENV", "REDIS"]);
        assert_eq!(schema.client, vec!["NEXT_PUBLIC_CLIENTVAR"]);
    }

    #[test]
    fn test_parse_schema_missing_sections() {
        let schema = parse_t3_env_schema("export const env = {};");
        assert!(schema.server.is_empty());
        assert!(schema.client.is_empty());
    }
}
