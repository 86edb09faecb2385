use crate::shell::User;

/// Turns a path expression into an absolute segment list. Never fails and
/// never touches the filesystem; callers check the result against the VFS.
pub fn resolve(expr: &str, cwd: &[String], user: User) -> Vec<String> {
    if expr == "/" {
        return Vec::new();
    }
    if expr == "~" {
        return user.home();
    }
    let mut out: Vec<String> = if expr.starts_with('/') {
        Vec::new()
    } else {
        cwd.to_vec()
    };
    for part in expr.split('/').filter(|p| !p.is_empty()) {
        match part {
            "." => {}
            ".." => {
                out.pop();
            }
            _ => out.push(part.to_string()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_root_and_home() {
        let cwd = v(&["var", "log"]);
        assert!(resolve("/", &cwd, User::Guest).is_empty());
        assert_eq!(resolve("~", &cwd, User::Guest), v(&["home", "guest"]));
        assert_eq!(resolve("~", &cwd, User::Root), v(&["home", "root"]));
    }

    #[test]
    fn test_parent_of_root_is_root() {
        assert!(resolve("..", &[], User::Guest).is_empty());
        assert!(resolve("../../..", &v(&["home"]), User::Root).is_empty());
    }

    #[test]
    fn test_absolute_ignores_cwd() {
        assert_eq!(
            resolve("/home/guest", &v(&["var"]), User::Guest),
            v(&["home", "guest"])
        );
    }

    #[test]
    fn test_relative_with_dots() {
        let cwd = v(&["home", "guest"]);
        assert_eq!(
            resolve("./projects//../notes.txt", &cwd, User::Guest),
            v(&["home", "guest", "notes.txt"])
        );
        assert_eq!(resolve(".", &cwd, User::Guest), cwd);
    }

    #[test]
    fn test_tilde_only_special_alone() {
        assert_eq!(
            resolve("~/x", &v(&["etc"]), User::Guest),
            v(&["etc", "~", "x"])
        );
    }
}
