//! Closed enumeration of supported project archetypes and their defaults

use serde::{Deserialize, Serialize};
use std::fmt;

/// Implementation language of a project, derived from its archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Node,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::Node => write!(f, "node"),
        }
    }
}

/// Recognized project/framework kinds
///
/// The archetype drives default runtime parameters (port, build and start
/// commands) and which template set the generator picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Archetype {
    Flask,
    Django,
    Fastapi,
    Nextjs,
    Nuxtjs,
    Nestjs,
    ReactSpa,
    VueSpa,
}

/// Static per-archetype runtime defaults, fixed at design time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchetypeDefaults {
    pub port: u16,
    pub build_command: &'static str,
    pub start_command: &'static str,
    pub entry_file: Option<&'static str>,
}

impl Archetype {
    /// All archetypes, in the order they are offered for selection
    pub const ALL: [Archetype; 8] = [
        Archetype::Flask,
        Archetype::Django,
        Archetype::Fastapi,
        Archetype::Nextjs,
        Archetype::Nuxtjs,
        Archetype::Nestjs,
        Archetype::ReactSpa,
        Archetype::VueSpa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Flask => "flask",
            Archetype::Django => "django",
            Archetype::Fastapi => "fastapi",
            Archetype::Nextjs => "nextjs",
            Archetype::Nuxtjs => "nuxtjs",
            Archetype::Nestjs => "nestjs",
            Archetype::ReactSpa => "react-spa",
            Archetype::VueSpa => "vue-spa",
        }
    }

    /// Language is a pure function of the archetype
    pub fn language(&self) -> Language {
        match self {
            Archetype::Flask | Archetype::Django | Archetype::Fastapi => Language::Python,
            Archetype::Nextjs
            | Archetype::Nuxtjs
            | Archetype::Nestjs
            | Archetype::ReactSpa
            | Archetype::VueSpa => Language::Node,
        }
    }

    pub fn defaults(&self) -> ArchetypeDefaults {
        match self {
            Archetype::Flask => ArchetypeDefaults {
                port: 5000,
                build_command: "pip install -r requirements.txt",
                start_command: "gunicorn -w 4 -b 0.0.0.0:5000 app:app",
                entry_file: Some("app.py"),
            },
            Archetype::Django => ArchetypeDefaults {
                port: 8000,
                build_command: "pip install -r requirements.txt",
                start_command: "gunicorn -w 4 -b 0.0.0.0:8000 wsgi:application",
                entry_file: Some("manage.py"),
            },
            Archetype::Fastapi => ArchetypeDefaults {
                port: 8000,
                build_command: "pip install -r requirements.txt",
                start_command: "uvicorn main:app --host 0.0.0.0 --port 8000",
                entry_file: Some("main.py"),
            },
            Archetype::Nextjs => ArchetypeDefaults {
                port: 3000,
                build_command: "npm run build",
                start_command: "npm run start",
                entry_file: None,
            },
            Archetype::Nuxtjs => ArchetypeDefaults {
                port: 3000,
                build_command: "npm run build",
                start_command: "node .output/server/index.mjs",
                entry_file: None,
            },
            Archetype::Nestjs => ArchetypeDefaults {
                port: 3000,
                build_command: "npm run build",
                start_command: "node dist/main.js",
                entry_file: None,
            },
            Archetype::ReactSpa => ArchetypeDefaults {
                port: 80,
                build_command: "npm run build",
                start_command: "nginx -g 'daemon off;'",
                entry_file: None,
            },
            Archetype::VueSpa => ArchetypeDefaults {
                port: 80,
                build_command: "npm run build",
                start_command: "nginx -g 'daemon off;'",
                entry_file: None,
            },
        }
    }

    /// Static single-page-app builds are served by a web server instead of
    /// a language runtime
    pub fn is_spa(&self) -> bool {
        matches!(self, Archetype::ReactSpa | Archetype::VueSpa)
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
