//! Filesystem every session starts from.

use crate::vfs::FsNode;

pub struct Project {
    pub title: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub link: &'static str,
}

pub struct Role {
    pub role: &'static str,
    pub company: &'static str,
    pub period: &'static str,
    pub description: &'static str,
}

pub const HERO_DESCRIPTION: &str = "Crafting high-performance digital experiences with cutting-edge web technologies and generative AI.";

pub const PROJECTS: &[Project] = &[
    Project {
        title: "AI Analytics Dashboard",
        description: "A comprehensive dashboard for visualizing complex datasets using machine learning algorithms to predict trends.",
        tags: &["React", "Python", "TensorFlow", "D3.js"],
        link: "#",
    },
    Project {
        title: "E-Commerce Microservices",
        description: "Scalable backend architecture capable of handling millions of transactions per second, built with Go and Kubernetes.",
        tags: &["Go", "Kubernetes", "gRPC", "PostgreSQL"],
        link: "#",
    },
    Project {
        title: "Generative Art Platform",
        description: "A community platform for creating and sharing AI-generated artwork using Stable Diffusion and Gemini.",
        tags: &["Next.js", "WebGL", "Gemini API", "Tailwind"],
        link: "#",
    },
    Project {
        title: "Real-time Collab Tool",
        description: "Figma-like collaboration tool allowing multiple users to edit documents simultaneously with low latency.",
        tags: &["WebSocket", "React", "Rust", "Redis"],
        link: "#",
    },
];

pub const SKILLS: &[(&str, &[&str])] = &[
    ("Frontend", &["React 18+", "TypeScript", "Tailwind CSS", "Next.js", "Three.js", "Framer Motion"]),
    ("Backend", &["Node.js", "Python", "Go", "PostgreSQL", "Redis", "GraphQL"]),
    ("AI & ML", &["Gemini API", "LangChain", "PyTorch", "OpenAI API", "Vector Databases"]),
    ("DevOps", &["Docker", "Kubernetes", "AWS", "CI/CD", "Terraform"]),
];

pub const EXPERIENCE: &[Role] = &[
    Role {
        role: "Senior Full Stack Engineer",
        company: "TechNova Solutions",
        period: "2021 - Present",
        description: "Leading a team of 8 engineers to rebuild the core legacy platform into a modern microservices architecture, improving system throughput by 300%.",
    },
    Role {
        role: "AI Research Engineer",
        company: "Future AI Labs",
        period: "2019 - 2021",
        description: "Developed experimental RAG pipelines and fine-tuned open-source models for specific enterprise use cases.",
    },
    Role {
        role: "Frontend Developer",
        company: "Creative Digital Agency",
        period: "2017 - 2019",
        description: "Delivered award-winning interactive websites for Fortune 500 clients using WebGL and React.",
    },
];

const CONTACT: &str =
    "EMAIL: bahroze1@hotmail.com\nLINKEDIN: linkedin.com/in/bahroze-ali\nGITHUB: github.com";
const TODO: &str = "- Refactor core legacy code\n- Update portfolio design\n- Integrate GenAI features\n- [ ] Hide the treasure map";
const TRANSMISSION: &str =
    "ENCRYPTED CONTENT. \nHINT: The browser console knows the way. \nKEY REQUIRED.";

/// "AI Analytics Dashboard" -> "ai_analytics_dashboard.txt"
pub fn project_file_name(title: &str) -> String {
    let slug = title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("{}.txt", slug)
}

fn project_file(p: &Project) -> String {
    format!(
        "TITLE: {}\nTAGS: {}\nLINK: {}\n\nDESCRIPTION:\n{}",
        p.title,
        p.tags.join(", "),
        p.link,
        p.description
    )
}

fn skills_file() -> String {
    SKILLS
        .iter()
        .map(|(category, items)| format!("[{}]\n{}", category.to_uppercase(), items.join(", ")))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn experience_file() -> String {
    EXPERIENCE
        .iter()
        .map(|e| {
            format!(
                "ROLE: {}\nCOMPANY: {}\nPERIOD: {}\nDETAILS: {}\n",
                e.role, e.company, e.period, e.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n----------------------------------------\n\n")
}

pub fn initial_tree() -> FsNode {
    let projects = PROJECTS.iter().fold(FsNode::dir(), |dir, p| {
        dir.with(&project_file_name(p.title), FsNode::file(&project_file(p)))
    });

    let guest = FsNode::dir()
        .with("projects", projects)
        .with("about.md", FsNode::file(HERO_DESCRIPTION))
        .with("skills.txt", FsNode::file(&skills_file()))
        .with("experience.log", FsNode::file(&experience_file()))
        .with("contact.info", FsNode::file(CONTACT))
        .with("todo.txt", FsNode::file(TODO))
        .with(
            ".secret_cache",
            FsNode::dir().with("transmission_404.dat", FsNode::file(TRANSMISSION)),
        );

    let root_home = FsNode::dir()
        .with(
            "system.conf",
            FsNode::file("ROOT_ACCESS=TRUE\nAI_MODEL=GEMINI-3-PRO"),
        )
        .with(
            "shadow",
            FsNode::file("root:$6$rounds=656000$.e4... (ENCRYPTED)"),
        );

    FsNode::dir()
        .with(
            "home",
            FsNode::dir().with("guest", guest).with("root", root_home),
        )
        .with("var", FsNode::dir().with("log", FsNode::dir()))
        .with("etc", FsNode::dir())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::lookup;

    fn segs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_layout() {
        let root = initial_tree();
        for dir in [
            &["home", "guest", "projects"][..],
            &["home", "guest", ".secret_cache"][..],
            &["home", "root"][..],
            &["var", "log"][..],
            &["etc"][..],
        ] {
            assert!(lookup(&root, &segs(dir)).is_some_and(FsNode::is_dir), "{:?}", dir);
        }
        let secret = lookup(
            &root,
            &segs(&["home", "guest", ".secret_cache", "transmission_404.dat"]),
        )
        .and_then(FsNode::content)
        .unwrap();
        assert!(secret.contains("KEY REQUIRED."));
    }

    #[test]
    fn test_project_files() {
        assert_eq!(
            project_file_name("Real-time Collab Tool"),
            "real-time_collab_tool.txt"
        );
        let root = initial_tree();
        let text = lookup(
            &root,
            &segs(&["home", "guest", "projects", "ai_analytics_dashboard.txt"]),
        )
        .and_then(FsNode::content)
        .unwrap();
        assert!(text.starts_with("TITLE: AI Analytics Dashboard\nTAGS: React, Python"));
    }

    #[test]
    fn test_skills_format() {
        let s = skills_file();
        assert!(s.starts_with("[FRONTEND]\nReact 18+, TypeScript"));
        assert!(s.contains("\n\n[AI & ML]\n"));
    }
}
