use git_version::git_version;

// -modified marks a dirty working tree
const COMMIT: &str = git_version!(
    args = ["--abbrev=10", "--always", "--dirty=-modified"],
    fallback = "unknown"
);

/// Human readable version line from the values `build.rs` exports.
pub fn describe_version(release: &str, latest: &str, ahead: &str) -> String {
    match (release, latest, ahead) {
        (tag, _, _) if !tag.is_empty() => format!("релиз {tag}"),
        ("", "", _) => "разработка".to_string(),
        ("", latest, "") => format!("разработка после {latest}"),
        ("", latest, ahead) => format!("разработка, {ahead} коммитов после {latest}"),
        _ => "разработка".to_string(),
    }
}

pub fn get_system_info() -> String {
    let profile = if cfg!(debug_assertions) {
        "отладочная"
    } else {
        "релизная"
    };
    let version = describe_version(
        option_env!("RELEASE_VERSION").unwrap_or(""),
        option_env!("LATEST_TAG").unwrap_or(""),
        option_env!("COMMITS_AHEAD").unwrap_or(""),
    );

    format!(
        "{} {} ({version})\nКоммит: {COMMIT}\nСборка: {profile}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    )
}
