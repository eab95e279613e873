//! Change request types.
//!
//! Read-only values built by the client from the request XML. Every type
//! renders itself through `Display`, which is what the report prints.

use std::fmt;
use std::str::FromStr;

use super::package::PackageSnapshot;

/// Lifecycle state of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    New,
    Review,
    Accepted,
    Declined,
    Revoked,
    Superseded,
    Deleted,
    /// A state name this client does not know about.
    Unknown(String),
}

impl RequestState {
    /// Only requests waiting for a decision are worth reporting on.
    ///
    /// Accepted requests commonly deleted their source branch on accept, so
    /// listing their files would be misleading or fail outright.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        matches!(self, Self::New | Self::Review)
    }

    /// Wire name of the state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::Review => "review",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Revoked => "revoked",
            Self::Superseded => "superseded",
            Self::Deleted => "deleted",
            Self::Unknown(name) => name,
        }
    }
}

impl FromStr for RequestState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "new" => Self::New,
            "review" => Self::Review,
            "accepted" => Self::Accepted,
            "declined" => Self::Declined,
            "revoked" => Self::Revoked,
            "superseded" => Self::Superseded,
            "deleted" => Self::Deleted,
            other => Self::Unknown(other.to_string()),
        })
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation type of a single action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    Submit,
    Delete,
    AddRole,
    SetBugowner,
    ChangeDevel,
    MaintenanceIncident,
    MaintenanceRelease,
    Release,
    Group,
    Other(String),
}

impl ActionKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Submit => "submit",
            Self::Delete => "delete",
            Self::AddRole => "add_role",
            Self::SetBugowner => "set_bugowner",
            Self::ChangeDevel => "change_devel",
            Self::MaintenanceIncident => "maintenance_incident",
            Self::MaintenanceRelease => "maintenance_release",
            Self::Release => "release",
            Self::Group => "group",
            Self::Other(name) => name,
        }
    }
}

impl FromStr for ActionKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "submit" => Self::Submit,
            "delete" => Self::Delete,
            "add_role" => Self::AddRole,
            "set_bugowner" => Self::SetBugowner,
            "change_devel" => Self::ChangeDevel,
            "maintenance_incident" => Self::MaintenanceIncident,
            "maintenance_release" => Self::MaintenanceRelease,
            "release" => Self::Release,
            "group" => Self::Group,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project/package location an action reads from or writes to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageRef {
    pub project: String,
    pub package: Option<String>,
    /// Source revision pinned by the request (source side only).
    pub rev: Option<String>,
    pub repository: Option<String>,
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.project)?;
        if let Some(package) = &self.package {
            write!(f, "/{package}")?;
        }
        if let Some(rev) = &self.rev {
            write!(f, "@{rev}")?;
        }
        if let Some(repository) = &self.repository {
            write!(f, " (repository {repository})")?;
        }
        Ok(())
    }
}

/// Who receives a role in `add_role` / `set_bugowner` actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignee {
    User(String),
    Group(String),
}

/// Role granted by an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    pub assignee: Assignee,
    pub role: String,
}

impl fmt::Display for RoleAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.assignee {
            Assignee::User(name) => write!(f, "{}: user {name}", self.role),
            Assignee::Group(name) => write!(f, "{}: group {name}", self.role),
        }
    }
}

/// One operation of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub source: Option<PackageRef>,
    pub target: Option<PackageRef>,
    pub role: Option<RoleAssignment>,
    /// `sourceupdate` option (`update`, `cleanup`, `noupdate`).
    pub sourceupdate: Option<String>,
    /// Files of the source package at the requested revision.
    pub src_pkg: Option<PackageSnapshot>,
    /// Files of the target package as it currently exists.
    pub tgt_pkg: Option<PackageSnapshot>,
}

impl Action {
    /// Create an action with no references or snapshots.
    #[must_use]
    pub const fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            source: None,
            target: None,
            role: None,
            sourceupdate: None,
            src_pkg: None,
            tgt_pkg: None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.kind)?;
        match (&self.source, &self.target) {
            (Some(src), Some(tgt)) => write!(f, " {src} -> {tgt}")?,
            (Some(src), None) => write!(f, " {src}")?,
            (None, Some(tgt)) => write!(f, " {tgt}")?,
            (None, None) => {}
        }
        if let Some(role) = &self.role {
            write!(f, " ({role})")?;
        }
        if let Some(update) = &self.sourceupdate {
            write!(f, " [sourceupdate={update}]")?;
        }
        Ok(())
    }
}

/// Reviewer a review is assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewTarget {
    User(String),
    Group(String),
    Project(String),
    Package { project: String, package: String },
}

impl fmt::Display for ReviewTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(name) => write!(f, "user:{name}"),
            Self::Group(name) => write!(f, "group:{name}"),
            Self::Project(project) => write!(f, "project:{project}"),
            Self::Package { project, package } => write!(f, "package:{project}/{package}"),
        }
    }
}

/// Review record attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// Review state as sent (`new`, `accepted`, `declined`, ...).
    pub state: String,
    pub by: ReviewTarget,
    pub who: Option<String>,
    pub comment: Option<String>,
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.state, self.by)?;
        if let Some(who) = &self.who {
            write!(f, " by {who}")?;
        }
        if let Some(comment) = self.comment.as_deref().map(str::trim) {
            if !comment.is_empty() {
                write!(f, ": {comment}")?;
            }
        }
        Ok(())
    }
}

/// Tracker issue linked to a request (e.g. `boo#1234`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub tracker: String,
    pub name: String,
    pub label: Option<String>,
    pub url: Option<String>,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => f.write_str(label)?,
            None => write!(f, "{}#{}", self.tracker, self.name)?,
        }
        if let Some(url) = &self.url {
            write!(f, " {url}")?;
        }
        Ok(())
    }
}

/// A change request with everything the report prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub id: String,
    pub creator: Option<String>,
    pub state: RequestState,
    pub actions: Vec<Action>,
    pub reviews: Vec<Review>,
    pub issues: Vec<Issue>,
    /// Raw description text, empty when the request has none.
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(project: &str, package: &str) -> PackageRef {
        PackageRef {
            project: project.to_string(),
            package: Some(package.to_string()),
            ..PackageRef::default()
        }
    }

    #[test]
    fn test_state_actionable() {
        assert!(RequestState::New.is_actionable());
        assert!(RequestState::Review.is_actionable());
        assert!(!RequestState::Accepted.is_actionable());
        assert!(!RequestState::Deleted.is_actionable());
        assert!(!RequestState::Unknown("frozen".to_string()).is_actionable());
    }

    #[test]
    fn test_state_parse_roundtrip_names() {
        for name in ["new", "review", "accepted", "declined", "revoked", "superseded", "deleted"] {
            let state: RequestState = name.parse().unwrap();
            assert_eq!(state.to_string(), name);
        }
        let state: RequestState = "frozen".parse().unwrap();
        assert_eq!(state, RequestState::Unknown("frozen".to_string()));
    }

    #[test]
    fn test_action_display_submit() {
        let mut action = Action::new(ActionKind::Submit);
        let mut src = pkg("home:alice:branches:devel:tools", "hello");
        src.rev = Some("5".to_string());
        action.source = Some(src);
        action.target = Some(pkg("devel:tools", "hello"));
        action.sourceupdate = Some("cleanup".to_string());
        assert_eq!(
            action.to_string(),
            "submit: home:alice:branches:devel:tools/hello@5 -> devel:tools/hello [sourceupdate=cleanup]"
        );
    }

    #[test]
    fn test_action_display_delete_and_role() {
        let mut delete = Action::new(ActionKind::Delete);
        delete.target = Some(pkg("openSUSE:Factory", "oldpkg"));
        assert_eq!(delete.to_string(), "delete: openSUSE:Factory/oldpkg");

        let mut add_role = Action::new(ActionKind::AddRole);
        add_role.target = Some(PackageRef {
            project: "devel:tools".to_string(),
            ..PackageRef::default()
        });
        add_role.role = Some(RoleAssignment {
            assignee: Assignee::Group("tools-team".to_string()),
            role: "maintainer".to_string(),
        });
        assert_eq!(
            add_role.to_string(),
            "add_role: devel:tools (maintainer: group tools-team)"
        );
    }

    #[test]
    fn test_review_display() {
        let review = Review {
            state: "accepted".to_string(),
            by: ReviewTarget::Group("factory-auto".to_string()),
            who: Some("factory-bot".to_string()),
            comment: Some("  Check script succeeded\n".to_string()),
        };
        assert_eq!(
            review.to_string(),
            "accepted group:factory-auto by factory-bot: Check script succeeded"
        );

        let pending = Review {
            state: "new".to_string(),
            by: ReviewTarget::Package {
                project: "devel:tools".to_string(),
                package: "hello".to_string(),
            },
            who: None,
            comment: Some(String::new()),
        };
        assert_eq!(pending.to_string(), "new package:devel:tools/hello");
    }

    #[test]
    fn test_issue_display() {
        let labelled = Issue {
            tracker: "bnc".to_string(),
            name: "1234".to_string(),
            label: Some("boo#1234".to_string()),
            url: Some("https://bugzilla.opensuse.org/show_bug.cgi?id=1234".to_string()),
        };
        assert_eq!(
            labelled.to_string(),
            "boo#1234 https://bugzilla.opensuse.org/show_bug.cgi?id=1234"
        );

        let bare = Issue {
            tracker: "cve".to_string(),
            name: "2024-0001".to_string(),
            label: None,
            url: None,
        };
        assert_eq!(bare.to_string(), "cve#2024-0001");
    }
}
