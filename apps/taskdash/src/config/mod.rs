pub mod api;
pub mod identity;

/// Environment variable with empty values treated as unset.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
