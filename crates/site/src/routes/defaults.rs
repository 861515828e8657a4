//! The built-in Learn Git navigation tree.

use super::RouteEntry;

fn section(title: &str, href: &str, items: &[(&str, &str)]) -> RouteEntry {
    RouteEntry::new(title, href).with_items(
        items
            .iter()
            .map(|(title, href)| RouteEntry::new(*title, *href))
            .collect(),
    )
}

/// Route tree used when the site configuration does not provide one.
///
/// ```
/// use learngit_site::routes::Routes;
///
/// let routes = Routes::default();
/// assert_eq!(routes.pages()[0].href, "/introduction");
/// ```
pub fn default_learngit_routes() -> Vec<RouteEntry> {
    vec![
        section(
            "Introduction",
            "/introduction",
            &[
                ("What is Git?", "/what-is-git"),
                ("Version Control", "/version-control"),
                ("How Git Works", "/how-git-works"),
            ],
        ),
        section(
            "Getting Started",
            "/getting-started",
            &[
                ("Installation", "/installation"),
                ("Configuration", "/configuration"),
                ("Your First Repository", "/first-repository"),
            ],
        ),
        section(
            "Basics",
            "/basics",
            &[
                ("Staging Changes", "/staging"),
                ("Committing", "/committing"),
                ("Viewing History", "/history"),
                ("Ignoring Files", "/ignoring-files"),
                ("Undoing Changes", "/undoing-changes"),
            ],
        ),
        section(
            "Branching",
            "/branching",
            &[
                ("Creating Branches", "/creating-branches"),
                ("Merging", "/merging"),
                ("Rebasing", "/rebasing"),
                ("Resolving Conflicts", "/resolving-conflicts"),
            ],
        ),
        section(
            "Remote Repositories",
            "/remotes",
            &[
                ("Cloning", "/cloning"),
                ("Fetching and Pulling", "/fetching-and-pulling"),
                ("Pushing", "/pushing"),
                ("Pull Requests", "/pull-requests"),
            ],
        ),
        section(
            "Advanced",
            "/advanced",
            &[
                ("Stashing", "/stashing"),
                ("Cherry-picking", "/cherry-picking"),
                ("Tags", "/tags"),
                ("Hooks", "/hooks"),
                ("Submodules", "/submodules"),
            ],
        )
        .container(),
    ]
}
