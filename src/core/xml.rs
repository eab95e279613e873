//! Parsing of build service XML responses.

use color_eyre::eyre::{bail, eyre, WrapErr};
use color_eyre::Result;
use roxmltree::{Document, Node};

use crate::state::{
    Action, ActionKind, Assignee, FileEntry, Issue, PackageRef, PackageSnapshot, Request,
    RequestState, Review, ReviewTarget, RoleAssignment,
};

/// Parse a `<request>` document. Package snapshots are left empty.
///
/// # Errors
///
/// Returns an error if the XML is malformed or required attributes are missing.
pub fn parse_request(xml: &str) -> Result<Request> {
    let doc = Document::parse(xml).wrap_err("Malformed request XML")?;
    let root = doc.root_element();
    expect_tag(root, "request")?;

    let id = required_attr(root, "id")?.to_string();
    let state: RequestState = first_child(root, "state")
        .ok_or_else(|| eyre!("Request '{id}' has no <state> element"))
        .and_then(|node| required_attr(node, "name"))?
        .parse()?;

    let actions = children(root, "action")
        .map(parse_action)
        .collect::<Result<Vec<_>>>()
        .wrap_err_with(|| format!("Invalid action in request '{id}'"))?;
    let reviews = children(root, "review")
        .map(parse_review)
        .collect::<Result<Vec<_>>>()
        .wrap_err_with(|| format!("Invalid review in request '{id}'"))?;
    let issues = root
        .descendants()
        .filter(|node| node.has_tag_name("issue"))
        .map(parse_issue)
        .collect::<Result<Vec<_>>>()
        .wrap_err_with(|| format!("Invalid issue in request '{id}'"))?;
    let description = first_child(root, "description")
        .map(text_of)
        .unwrap_or_default();

    Ok(Request {
        creator: root.attribute("creator").map(str::to_string),
        id,
        state,
        actions,
        reviews,
        issues,
        description,
    })
}

/// Parse a `<directory>` listing of a package.
///
/// # Errors
///
/// Returns an error if the XML is malformed or an entry lacks `name`, `md5`
/// or a numeric `mtime`.
pub fn parse_directory(xml: &str, project: &str, package: &str) -> Result<PackageSnapshot> {
    let doc = Document::parse(xml).wrap_err("Malformed directory XML")?;
    let root = doc.root_element();
    expect_tag(root, "directory")?;

    let files = children(root, "entry")
        .map(|entry| {
            let name = required_attr(entry, "name")?;
            let md5 = required_attr(entry, "md5")?;
            let mtime = required_attr(entry, "mtime")?;
            let mtime = mtime
                .parse::<u64>()
                .wrap_err_with(|| format!("Invalid mtime '{mtime}' for file '{name}'"))?;
            Ok(FileEntry {
                md5: md5.to_string(),
                mtime,
                name: name.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()
        .wrap_err_with(|| format!("Invalid file listing for {project}/{package}"))?;

    Ok(PackageSnapshot {
        project: project.to_string(),
        package: package.to_string(),
        rev: root.attribute("rev").map(str::to_string),
        srcmd5: root.attribute("srcmd5").map(str::to_string),
        files,
    })
}

/// Extract the `<summary>` of an error `<status>` document, if the body is one.
#[must_use]
pub fn parse_status_summary(xml: &str) -> Option<String> {
    let doc = Document::parse(xml).ok()?;
    let root = doc.root_element();
    if !root.has_tag_name("status") {
        return None;
    }
    let summary = text_of(first_child(root, "summary")?);
    let summary = summary.trim();
    (!summary.is_empty()).then(|| summary.to_string())
}

fn parse_action(node: Node<'_, '_>) -> Result<Action> {
    let kind: ActionKind = node.attribute("type").unwrap_or("submit").parse()?;
    let mut action = Action::new(kind);

    action.source = first_child(node, "source").map(parse_package_ref).transpose()?;
    action.target = first_child(node, "target").map(parse_package_ref).transpose()?;

    if let Some(person) = first_child(node, "person") {
        action.role = Some(parse_role(person, Assignee::User)?);
    } else if let Some(group) = first_child(node, "group") {
        action.role = Some(parse_role(group, Assignee::Group)?);
    }

    action.sourceupdate = first_child(node, "options")
        .and_then(|options| first_child(options, "sourceupdate"))
        .map(text_of)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    Ok(action)
}

fn parse_role(node: Node<'_, '_>, assignee: fn(String) -> Assignee) -> Result<RoleAssignment> {
    Ok(RoleAssignment {
        assignee: assignee(required_attr(node, "name")?.to_string()),
        // set_bugowner carries no role attribute
        role: node.attribute("role").unwrap_or("bugowner").to_string(),
    })
}

fn parse_package_ref(node: Node<'_, '_>) -> Result<PackageRef> {
    Ok(PackageRef {
        project: required_attr(node, "project")?.to_string(),
        package: node.attribute("package").map(str::to_string),
        rev: node.attribute("rev").map(str::to_string),
        repository: node.attribute("repository").map(str::to_string),
    })
}

fn parse_review(node: Node<'_, '_>) -> Result<Review> {
    let by = if let Some(user) = node.attribute("by_user") {
        ReviewTarget::User(user.to_string())
    } else if let Some(group) = node.attribute("by_group") {
        ReviewTarget::Group(group.to_string())
    } else if let (Some(project), Some(package)) =
        (node.attribute("by_project"), node.attribute("by_package"))
    {
        ReviewTarget::Package {
            project: project.to_string(),
            package: package.to_string(),
        }
    } else if let Some(project) = node.attribute("by_project") {
        ReviewTarget::Project(project.to_string())
    } else {
        bail!("Review has no by_user, by_group or by_project attribute");
    };

    Ok(Review {
        state: required_attr(node, "state")?.to_string(),
        by,
        who: node.attribute("who").map(str::to_string),
        comment: first_child(node, "comment").map(text_of),
    })
}

fn parse_issue(node: Node<'_, '_>) -> Result<Issue> {
    Ok(Issue {
        tracker: required_attr(node, "tracker")?.to_string(),
        name: required_attr(node, "name")?.to_string(),
        label: node.attribute("label").map(str::to_string),
        url: node.attribute("url").map(str::to_string),
    })
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn expect_tag(node: Node<'_, '_>, name: &str) -> Result<()> {
    if node.has_tag_name(name) {
        Ok(())
    } else {
        bail!(
            "Expected <{name}> element, found <{}>",
            node.tag_name().name()
        )
    }
}

fn required_attr<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        eyre!(
            "<{}> element is missing the '{name}' attribute",
            node.tag_name().name()
        )
    })
}

fn children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |child| child.has_tag_name(name))
}

fn first_child<'a, 'input>(node: Node<'a, 'input>, name: &'static str) -> Option<Node<'a, 'input>> {
    children(node, name).next()
}

/// Concatenated text content of an element's direct text children.
fn text_of(node: Node<'_, '_>) -> String {
    node.children()
        .filter(Node::is_text)
        .filter_map(|child| child.text())
        .collect()
}
