//! Rules for projects that declare their variables with a t3-env schema.
//!
//! The schema splits variables into `server` and `client` lists. A usage is
//! checked against the list matching the context it appears in, where the
//! context is guessed from the file path and the access idiom.

use serde::Serialize;

use crate::framework::FrameworkWarning;
use crate::scanner::{
    EnvUsage,
    UsagePattern,
};

/// Framework name recorded on t3-env warnings.
pub const T3_ENV: &str = "t3-env";

/// A t3-env warning has the same shape as any framework warning.
pub type T3EnvWarning = FrameworkWarning;

/// Declared variables of a `createEnv({ server, client })` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct T3EnvSchema {
    /// Server-only variables.
    pub server: Vec<String>,
    /// Variables exposed to the client.
    pub client: Vec<String>,
}

impl T3EnvSchema {
    fn in_server(&self, variable: &str) -> bool {
        self.server.iter().any(|v| v == variable)
    }

    fn in_client(&self, variable: &str) -> bool {
        self.client.iter().any(|v| v == variable)
    }
}

/// Where a usage is assumed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageContext {
    /// Server code.
    Server,
    /// Code shipped to the browser.
    Client,
    /// Neither the path nor the idiom tells.
    Unknown,
}

/// Guesses the context of `usage`.
///
/// Server paths win over client paths, so `app/api/server/route.ts` is
/// server code even though it sits under `/app/`.
pub fn usage_context(usage: &EnvUsage) -> UsageContext {
    let path = usage.file.replace('\\', "/");
    if path.ends_with(".server.ts") || path.ends_with(".server.js") || path.contains("server") {
        return UsageContext::Server;
    }
    let client_path = ["/components/", "/pages/", "/app/", "client", "browser"]
        .iter()
        .any(|p| path.contains(p));
    if client_path || usage.pattern == UsagePattern::ImportMetaEnv {
        return UsageContext::Client;
    }
    if usage.pattern == UsagePattern::ProcessEnv {
        return UsageContext::Server;
    }
    UsageContext::Unknown
}

/// Checks one usage against `schema`, appending to `out`.
///
/// A `(variable, reason)` pair already present in `out` is not added again,
/// so calling this for every usage of a project yields one warning per
/// distinct problem.
pub fn apply_t3_env_rules(usage: &EnvUsage, schema: &T3EnvSchema, out: &mut Vec<T3EnvWarning>) {
    let variable = usage.variable.as_str();
    let in_server = schema.in_server(variable);
    let in_client = schema.in_client(variable);
    let mut reasons = Vec::new();

    match usage_context(usage) {
        UsageContext::Client if in_server && !in_client => {
            reasons.push(format!("Server-only variable \"{variable}\" is used in client code"));
        }
        UsageContext::Server if in_client && !in_server => {
            reasons.push(format!(
                "Client variable \"{variable}\" is used in server code; declare it under server"
            ));
        }
        _ => {}
    }
    if !in_server && !in_client {
        reasons.push(format!("\"{variable}\" is not declared in the t3-env schema"));
    }
    if variable.starts_with("NEXT_PUBLIC_") {
        reasons.push(
            "Prefer typed access through the t3-env schema over \"NEXT_PUBLIC_\" variables"
                .to_string(),
        );
    }

    for reason in reasons {
        let seen = out
            .iter()
            .any(|w| w.variable == usage.variable && w.reason == reason);
        if !seen {
            out.push(FrameworkWarning::for_usage(usage, T3_ENV, reason));
        }
    }
}

/// Runs [`apply_t3_env_rules`] over every usage.
pub fn check_t3_env_usages(usages: &[EnvUsage], schema: &T3EnvSchema) -> Vec<T3EnvWarning> {
    let mut out = Vec::new();
    for usage in usages {
        apply_t3_env_rules(usage, schema, &mut out);
    }
    out
}
