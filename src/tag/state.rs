//! Parser states and the wildcard bitset.

use serde::Serialize;

/// Position of the parser within the tag grammar.
///
/// The order matters: range matching compares states by position, and the
/// wildcard back-fill walks the range between two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagState {
    #[default]
    None,
    Lang,
    PreExtlang,
    Extlang,
    PreScript,
    Script,
    PreRegion,
    Region,
    PreVariant,
    Variant,
    PreExtension,
    Extension,
    InExtension,
    ExtensionToken,
    InExtensionToken,
    ExtensionToken2,
    PrePrivateUse,
    PrivateUse,
    InPrivateUse,
    PrivateUseToken,
    InPrivateUseToken,
    PrivateUseToken2,
    End,
}

impl TagState {
    const ALL: [TagState; 23] = [
        TagState::None,
        TagState::Lang,
        TagState::PreExtlang,
        TagState::Extlang,
        TagState::PreScript,
        TagState::Script,
        TagState::PreRegion,
        TagState::Region,
        TagState::PreVariant,
        TagState::Variant,
        TagState::PreExtension,
        TagState::Extension,
        TagState::InExtension,
        TagState::ExtensionToken,
        TagState::InExtensionToken,
        TagState::ExtensionToken2,
        TagState::PrePrivateUse,
        TagState::PrivateUse,
        TagState::InPrivateUse,
        TagState::PrivateUseToken,
        TagState::InPrivateUseToken,
        TagState::PrivateUseToken2,
        TagState::End,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// The following state in grammar order. `End` stays `End`.
    pub fn next(self) -> TagState {
        Self::ALL
            .get(self.index() + 1)
            .copied()
            .unwrap_or(TagState::End)
    }

    /// The preceding state in grammar order. `None` stays `None`.
    pub fn prev(self) -> TagState {
        match self.index() {
            0 => TagState::None,
            i => Self::ALL[i - 1],
        }
    }

    /// Where a `-` token leads from this state, if it may appear here.
    pub fn after_hyphen(self) -> Option<TagState> {
        match self {
            TagState::PreExtlang => Some(TagState::Extlang),
            TagState::PreScript => Some(TagState::Script),
            TagState::PreRegion => Some(TagState::Region),
            TagState::PreVariant => Some(TagState::Variant),
            TagState::PreExtension => Some(TagState::Extension),
            TagState::InExtension => Some(TagState::ExtensionToken),
            TagState::InExtensionToken => Some(TagState::ExtensionToken2),
            TagState::PrePrivateUse => Some(TagState::PrivateUse),
            TagState::InPrivateUse => Some(TagState::PrivateUseToken),
            TagState::InPrivateUseToken => Some(TagState::PrivateUseToken2),
            _ => None,
        }
    }

    /// Whether input may end in this state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TagState::None
                | TagState::PreExtlang
                | TagState::PreScript
                | TagState::PreRegion
                | TagState::PreVariant
                | TagState::PreExtension
                | TagState::PrePrivateUse
                | TagState::InExtensionToken
                | TagState::InPrivateUseToken
        )
    }

    /// Bit used for this state in a [`WildcardMap`].
    fn bit(self) -> Option<u32> {
        match self {
            TagState::None | TagState::End => None,
            state => Some(1 << (state.index() - 1)),
        }
    }
}

/// Set of states whose component was filled by a `*` in a language range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct WildcardMap(u32);

impl WildcardMap {
    pub fn insert(&mut self, state: TagState) {
        if let Some(bit) = state.bit() {
            self.0 |= bit;
        }
    }

    pub fn contains(&self, state: TagState) -> bool {
        state.bit().is_some_and(|bit| self.0 & bit != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// States present in the map, in grammar order.
    pub fn states(&self) -> impl Iterator<Item = TagState> + '_ {
        TagState::ALL.iter().copied().filter(|s| self.contains(*s))
    }

    pub fn bits(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_and_prev() {
        assert_eq!(TagState::None.next(), TagState::Lang);
        assert_eq!(TagState::Lang.next(), TagState::PreExtlang);
        assert_eq!(TagState::End.next(), TagState::End);
        assert_eq!(TagState::Extlang.prev(), TagState::PreExtlang);
        assert_eq!(TagState::None.prev(), TagState::None);
    }

    #[test]
    fn test_after_hyphen() {
        assert_eq!(TagState::PreRegion.after_hyphen(), Some(TagState::Region));
        assert_eq!(
            TagState::InPrivateUseToken.after_hyphen(),
            Some(TagState::PrivateUseToken2)
        );
        assert_eq!(TagState::Lang.after_hyphen(), None);
        assert_eq!(TagState::Region.after_hyphen(), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(TagState::PreExtlang.is_terminal());
        assert!(TagState::InExtensionToken.is_terminal());
        assert!(!TagState::InExtension.is_terminal());
        assert!(!TagState::Lang.is_terminal());
        assert!(!TagState::PrivateUseToken.is_terminal());
    }

    #[test]
    fn test_ordering() {
        assert!(TagState::PreVariant < TagState::Variant);
        assert!(TagState::PrivateUse > TagState::Extension);
    }

    #[test]
    fn test_wildcard_map() {
        let mut map = WildcardMap::default();
        assert!(map.is_empty());

        map.insert(TagState::Lang);
        map.insert(TagState::Region);
        map.insert(TagState::None);

        assert_eq!(map.bits(), 1 | (1 << 6));
        assert!(map.contains(TagState::Region));
        assert!(!map.contains(TagState::Script));
        assert_eq!(
            map.states().collect::<Vec<_>>(),
            vec![TagState::Lang, TagState::Region]
        );
    }
}
