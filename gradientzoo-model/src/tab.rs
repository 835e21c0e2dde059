use std::fmt;

/// Navigation entries the header knows how to highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Tab {
    Home,
    CreateModel,
    Profile,
    Login,
    Register,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Home,
        Tab::CreateModel,
        Tab::Profile,
        Tab::Login,
        Tab::Register,
    ];

    /// Tag used by pages when they mount the header.
    pub fn tag(self) -> &'static str {
        match self {
            Tab::Home => "home",
            Tab::CreateModel => "create-model",
            Tab::Profile => "profile",
            Tab::Login => "login",
            Tab::Register => "register",
        }
    }

    /// Unknown tags map to `None`, which highlights nothing.
    pub fn from_tag(tag: &str) -> Option<Tab> {
        Tab::ALL.into_iter().find(|tab| tab.tag() == tag)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
