//! Framework-specific rules for how environment variables may be accessed.
//!
//! Each framework exposes variables to the browser differently. The rules
//! here flag usages that either leak server values or read variables the
//! framework will never provide.

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::patterns::SensitiveKeyPatterns;
use crate::scanner::{
    EnvUsage,
    UsagePattern,
};

static USE_CLIENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*["']use client["'];?\s*$"#).expect("valid regex")
});

/// The framework a project is built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    /// SvelteKit (`@sveltejs/kit`).
    SvelteKit,
    /// Next.js (`next`).
    NextJs,
    /// Angular (`@angular/core`).
    Angular,
    /// Anything else; no rules apply.
    #[default]
    Unknown,
}

impl Framework {
    /// Display name used in warnings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SvelteKit => "sveltekit",
            Self::NextJs => "nextjs",
            Self::Angular => "angular",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A usage that breaks a framework convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameworkWarning {
    /// Variable name.
    pub variable: String,
    /// What is wrong and what to do instead.
    pub reason: String,
    /// File of the usage.
    pub file: String,
    /// 1-based line of the usage.
    pub line: usize,
    /// Framework whose rule fired, e.g. `sveltekit` or `t3-env`.
    pub framework: String,
}

impl FrameworkWarning {
    pub(crate) fn for_usage(usage: &EnvUsage, framework: &str, reason: impl Into<String>) -> Self {
        Self {
            variable: usage.variable.clone(),
            reason: reason.into(),
            file: usage.file.clone(),
            line: usage.line,
            framework: framework.to_string(),
        }
    }
}

/// Returns `true` if `content` starts a Next.js client component, i.e. has a
/// `"use client"` directive on its own line.
pub fn is_client_component(content: &str) -> bool {
    USE_CLIENT.is_match(content)
}

/// Everything the rules need besides the usage itself.
#[derive(Debug, Clone, Default)]
pub struct FrameworkRules {
    /// Detected framework.
    pub framework: Framework,
    /// Files (as recorded on usages) that are Next.js client components.
    pub client_files: HashSet<String>,
}

impl FrameworkRules {
    /// Rules for `framework` with no known client components.
    pub fn new(framework: Framework) -> Self {
        Self {
            framework,
            client_files: HashSet::new(),
        }
    }

    /// Marks `file` as a client component.
    pub fn with_client_file(mut self, file: impl Into<String>) -> Self {
        self.client_files.insert(file.into());
        self
    }

    /// Checks one usage and appends any warnings to `out`.
    pub fn apply(&self, usage: &EnvUsage, out: &mut Vec<FrameworkWarning>) {
        let name = self.framework.as_str();
        let reasons = match self.framework {
            Framework::SvelteKit => sveltekit_rules(usage),
            Framework::NextJs => nextjs_rules(usage, self.client_files.contains(&usage.file)),
            Framework::Angular => angular_rules(usage),
            Framework::Unknown => Vec::new(),
        };
        out.extend(
            reasons
                .into_iter()
                .map(|reason| FrameworkWarning::for_usage(usage, name, reason)),
        );
    }
}

/// Applies the rules of `rules.framework` to `usage`, appending to `out`.
pub fn apply_framework_rules(
    usage: &EnvUsage,
    rules: &FrameworkRules,
    out: &mut Vec<FrameworkWarning>,
) {
    rules.apply(usage, out);
}

/// SvelteKit: `VITE_` belongs to `import.meta.env` only, and the `$env`
/// modules split on the `PUBLIC_` prefix.
pub fn sveltekit_rules(usage: &EnvUsage) -> Vec<String> {
    let vite = usage.variable.starts_with("VITE_");
    let public = usage.variable.starts_with("PUBLIC_");
    let mut reasons = Vec::new();

    match usage.pattern {
        UsagePattern::ImportMetaEnv if !vite => {
            reasons.push(
                "Variables accessed through import.meta.env must start with \"VITE_\"".to_string(),
            );
        }
        UsagePattern::ProcessEnv if vite => {
            reasons.push(
                "Variables accessed through process.env must not start with \"VITE_\"".to_string(),
            );
        }
        UsagePattern::SvelteKit => {
            if let Some(module) = usage.module {
                if module.is_static() && vite {
                    reasons.push(format!(
                        "{} variables must not start with \"VITE_\"",
                        module.as_str()
                    ));
                }
                if module.is_public() && !public {
                    reasons.push(format!(
                        "{} variables must start with \"PUBLIC_\"",
                        module.as_str()
                    ));
                }
                if !module.is_public() && public {
                    reasons.push(format!(
                        "{} variables must not start with \"PUBLIC_\"",
                        module.as_str()
                    ));
                }
            }
        }
        _ => {}
    }
    reasons
}

/// Next.js: client components only see `NEXT_PUBLIC_` variables, and those
/// are shipped to the browser.
pub fn nextjs_rules(usage: &EnvUsage, is_client_file: bool) -> Vec<String> {
    let public = usage.variable.starts_with("NEXT_PUBLIC_");
    let mut reasons = Vec::new();

    if usage.pattern == UsagePattern::ImportMetaEnv {
        reasons.push("Next.js does not support import.meta.env; use process.env".to_string());
    }
    if is_client_file && usage.pattern == UsagePattern::ProcessEnv && !public {
        reasons.push(
            "Client components can only read variables prefixed with \"NEXT_PUBLIC_\"".to_string(),
        );
    }
    if public && SensitiveKeyPatterns::is_sensitive(&usage.variable) {
        reasons.push(
            "\"NEXT_PUBLIC_\" variables are exposed to the browser; do not store secrets under this prefix"
                .to_string(),
        );
    }
    reasons
}

/// Angular: no `process.env` in components, and client variables use the
/// `NG_APP_` prefix.
pub fn angular_rules(usage: &EnvUsage) -> Vec<String> {
    let mut reasons = Vec::new();
    if usage.pattern == UsagePattern::ProcessEnv && usage.file.ends_with(".component.ts") {
        reasons.push(
            "process.env is not available in Angular components; use environment files".to_string(),
        );
    }
    if usage.variable.starts_with("CLIENT_") || usage.variable.starts_with("BROWSER_") {
        reasons.push("Client-side variables should use the \"NG_APP_\" prefix".to_string());
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan_usages;

    fn usage(file: &str, src: &str) -> EnvUsage {
        scan_usages(file, src).remove(0)
    }

    fn warnings(rules: &FrameworkRules, u: &EnvUsage) -> Vec<FrameworkWarning> {
        let mut out = Vec::new();
        apply_framework_rules(u, rules, &mut out);
        out
    }

    #[test]
    fn test_sveltekit_import_meta_requires_vite_prefix() {
        let rules = FrameworkRules::new(Framework::SvelteKit);
        assert_eq!(warnings(&rules, &usage("a.ts", "import.meta.env.API_URL")).len(), 1);
        assert!(warnings(&rules, &usage("a.ts", "import.meta.env.VITE_API_URL")).is_empty());
    }

    #[test]
    fn test_sveltekit_process_env_rejects_vite_prefix() {
        let rules = FrameworkRules::new(Framework::SvelteKit);
        let out = warnings(&rules, &usage("a.ts", "process.env.VITE_SECRET"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].framework, "sveltekit");
        assert!(warnings(&rules, &usage("a.ts", "process.env.SECRET")).is_empty());
    }

    #[test]
    fn test_sveltekit_static_modules_reject_vite_prefix() {
        let rules = FrameworkRules::new(Framework::SvelteKit);
        let out = warnings(&rules, &usage("a.ts", "'$env/static/private/VITE_KEY'"));
        assert_eq!(out.len(), 1);
        assert!(out[0].reason.contains("$env/static/private"));
        assert!(warnings(&rules, &usage("a.ts", "'$env/static/private/DB_URL'")).is_empty());
    }

    #[test]
    fn test_sveltekit_public_prefix() {
        let rules = FrameworkRules::new(Framework::SvelteKit);
        assert_eq!(warnings(&rules, &usage("a.ts", "'$env/static/public/API'")).len(), 1);
        assert!(warnings(&rules, &usage("a.ts", "'$env/dynamic/public/PUBLIC_API'")).is_empty());
        assert_eq!(warnings(&rules, &usage("a.ts", "'$env/dynamic/private/PUBLIC_API'")).len(), 1);
    }

    #[test]
    fn test_nextjs_client_component_needs_public_prefix() {
        let rules = FrameworkRules::new(Framework::NextJs).with_client_file("app/page.tsx");
        let u = usage("app/page.tsx", "process.env.API_URL");
        assert_eq!(warnings(&rules, &u).len(), 1);
        let u = usage("app/page.tsx", "process.env.NEXT_PUBLIC_API_URL");
        assert!(warnings(&rules, &u).is_empty());
        let u = usage("app/api/route.ts", "process.env.API_URL");
        assert!(warnings(&rules, &u).is_empty());
    }

    #[test]
    fn test_nextjs_public_secret() {
        let rules = FrameworkRules::new(Framework::NextJs);
        let out = warnings(&rules, &usage("lib/x.ts", "process.env.NEXT_PUBLIC_API_SECRET"));
        assert_eq!(out.len(), 1);
        assert!(out[0].reason.contains("exposed to the browser"));
    }

    #[test]
    fn test_nextjs_import_meta() {
        let rules = FrameworkRules::new(Framework::NextJs);
        assert_eq!(warnings(&rules, &usage("a.ts", "import.meta.env.NEXT_PUBLIC_X")).len(), 1);
    }

    #[test]
    fn test_angular_rules() {
        let rules = FrameworkRules::new(Framework::Angular);
        let u = usage("src/app/home.component.ts", "process.env.API_URL");
        assert_eq!(warnings(&rules, &u).len(), 1);
        let u = usage("src/app/home.service.ts", "process.env.CLIENT_ID");
        let out = warnings(&rules, &u);
        assert_eq!(out.len(), 1);
        assert!(out[0].reason.contains("NG_APP_"));
    }

    #[test]
    fn test_unknown_framework_has_no_rules() {
        let rules = FrameworkRules::default();
        assert!(warnings(&rules, &usage("a.ts", "import.meta.env.ANYTHING")).is_empty());
    }

    #[test]
    fn test_use_client_directive() {
        assert!(is_client_component("\"use client\";\nexport default function Page() {}"));
        assert!(is_client_component("'use client'\n"));
        assert!(!is_client_component("// \"use client\" is not needed here\n"));
    }
}
