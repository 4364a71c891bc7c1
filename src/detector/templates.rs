//! Static table mapping file extensions and language names to skill templates.

use crate::types::{Skill, SkillIcon};

pub struct SkillTemplate {
    pub extension: &'static str,
    /// Lowercased language name as reported by the hosting API, if any
    /// language maps onto this template.
    pub language: Option<&'static str>,
    pub name: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub icon: SkillIcon,
    pub modules: [&'static str; 5],
}

impl SkillTemplate {
    pub fn instantiate(&self) -> Skill {
        Skill::new(
            self.name,
            self.description,
            self.color,
            self.icon,
            &self.modules,
        )
    }
}

pub const TEMPLATES: &[SkillTemplate] = &[
    SkillTemplate {
        extension: "js",
        language: Some("javascript"),
        name: "JavaScript",
        description: "High-level programming language for web development",
        color: "from-yellow-400 to-yellow-500",
        icon: SkillIcon::FileCode,
        modules: [
            "Master JavaScript fundamentals",
            "Learn ES6+ features",
            "Understand asynchronous programming",
            "Work with DOM manipulation",
            "Build a JavaScript project",
        ],
    },
    SkillTemplate {
        extension: "ts",
        language: Some("typescript"),
        name: "TypeScript",
        description: "Strongly typed programming language that builds on JavaScript",
        color: "from-blue-500 to-indigo-500",
        icon: SkillIcon::FileCode,
        modules: [
            "Learn basic types",
            "Understand interfaces",
            "Master generics",
            "Use with frameworks",
            "Advanced type utilities",
        ],
    },
    SkillTemplate {
        extension: "jsx",
        language: None,
        name: "React",
        description: "A JavaScript library for building user interfaces",
        color: "from-blue-400 to-cyan-400",
        icon: SkillIcon::Code,
        modules: [
            "Understand React components",
            "Master React hooks",
            "Learn state management",
            "Build a small project",
            "Implement routing",
        ],
    },
    SkillTemplate {
        extension: "tsx",
        language: None,
        name: "React with TypeScript",
        description: "React with TypeScript for type-safe components",
        color: "from-blue-500 to-cyan-500",
        icon: SkillIcon::Code,
        modules: [
            "Set up TypeScript with React",
            "Create typed components",
            "Use typed hooks",
            "Implement typed props",
            "Advanced TypeScript patterns in React",
        ],
    },
    SkillTemplate {
        extension: "css",
        language: Some("css"),
        name: "CSS",
        description: "Cascading Style Sheets for web design",
        color: "from-pink-400 to-rose-400",
        icon: SkillIcon::Paintbrush,
        modules: [
            "Master flexbox layout",
            "Learn CSS Grid",
            "Implement responsive design",
            "Use CSS animations",
            "Understand CSS variables",
        ],
    },
    SkillTemplate {
        extension: "html",
        language: Some("html"),
        name: "HTML",
        description: "HyperText Markup Language for web pages",
        color: "from-orange-400 to-red-400",
        icon: SkillIcon::FileCode,
        modules: [
            "Learn semantic HTML",
            "Understand document structure",
            "Master forms and inputs",
            "Implement accessibility",
            "Use HTML5 features",
        ],
    },
    SkillTemplate {
        extension: "py",
        language: Some("python"),
        name: "Python",
        description: "High-level programming language for general-purpose programming",
        color: "from-blue-400 to-green-400",
        icon: SkillIcon::FileCode,
        modules: [
            "Learn Python basics",
            "Understand data structures",
            "Master functions and modules",
            "Work with libraries",
            "Build a Python project",
        ],
    },
    SkillTemplate {
        extension: "java",
        language: Some("java"),
        name: "Java",
        description: "Object-oriented programming language",
        color: "from-red-500 to-orange-500",
        icon: SkillIcon::Coffee,
        modules: [
            "Learn Java syntax",
            "Understand OOP principles",
            "Master exception handling",
            "Work with collections",
            "Build a Java application",
        ],
    },
    SkillTemplate {
        extension: "go",
        language: Some("go"),
        name: "Go",
        description: "Statically typed, compiled programming language",
        color: "from-blue-400 to-teal-400",
        icon: SkillIcon::FileCode,
        modules: [
            "Learn Go basics",
            "Understand concurrency",
            "Master error handling",
            "Work with packages",
            "Build a Go application",
        ],
    },
    SkillTemplate {
        extension: "rb",
        language: Some("ruby"),
        name: "Ruby",
        description: "Dynamic, object-oriented programming language",
        color: "from-red-500 to-pink-500",
        icon: SkillIcon::Gem,
        modules: [
            "Learn Ruby syntax",
            "Understand object-oriented programming",
            "Master blocks and procs",
            "Work with gems",
            "Build a Ruby application",
        ],
    },
    SkillTemplate {
        extension: "php",
        language: Some("php"),
        name: "PHP",
        description: "Server-side scripting language for web development",
        color: "from-indigo-400 to-purple-500",
        icon: SkillIcon::FileCode,
        modules: [
            "Learn PHP basics",
            "Understand web integration",
            "Master database operations",
            "Work with frameworks",
            "Build a PHP application",
        ],
    },
    SkillTemplate {
        extension: "rs",
        language: Some("rust"),
        name: "Rust",
        description: "Systems programming language focused on safety and performance",
        color: "from-orange-500 to-red-600",
        icon: SkillIcon::FileCode,
        modules: [
            "Learn Rust syntax",
            "Understand ownership and borrowing",
            "Master error handling",
            "Work with crates",
            "Build a Rust application",
        ],
    },
    SkillTemplate {
        extension: "swift",
        language: Some("swift"),
        name: "Swift",
        description: "Programming language for iOS, macOS, and more",
        color: "from-orange-400 to-red-500",
        icon: SkillIcon::FileCode,
        modules: [
            "Learn Swift basics",
            "Understand optionals",
            "Master closures",
            "Work with UIKit/SwiftUI",
            "Build an iOS application",
        ],
    },
    SkillTemplate {
        extension: "cs",
        language: Some("c#"),
        name: "C#",
        description: "Object-oriented programming language by Microsoft",
        color: "from-purple-500 to-indigo-600",
        icon: SkillIcon::Hash,
        modules: [
            "Learn C# syntax",
            "Understand .NET framework",
            "Master LINQ",
            "Work with ASP.NET",
            "Build a C# application",
        ],
    },
    SkillTemplate {
        extension: "cpp",
        language: Some("c++"),
        name: "C++",
        description: "General-purpose programming language with performance and flexibility",
        color: "from-blue-600 to-indigo-700",
        icon: SkillIcon::FileCode,
        modules: [
            "Learn C++ syntax",
            "Understand memory management",
            "Master templates",
            "Work with STL",
            "Build a C++ application",
        ],
    },
];

/// Template for a file name, keyed by the lowercased suffix after its last dot.
pub fn by_file_name(file_name: &str) -> Option<&'static SkillTemplate> {
    let (_, extension) = file_name.rsplit_once('.')?;
    by_extension(&extension.to_lowercase())
}

pub fn by_extension(extension: &str) -> Option<&'static SkillTemplate> {
    TEMPLATES.iter().find(|t| t.extension == extension)
}

pub fn by_language(language: &str) -> Option<&'static SkillTemplate> {
    let normalized = language.trim().to_lowercase();
    TEMPLATES
        .iter()
        .find(|t| t.language == Some(normalized.as_str()))
}

pub fn by_name(name: &str) -> Option<&'static SkillTemplate> {
    TEMPLATES.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}
