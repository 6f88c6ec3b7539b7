//! notify event → [`ChangeEvent`] mapping.

use std::path::Path;

use notify::EventKind;
use notify::event::{MetadataKind, ModifyKind};

use crate::core::{ChangeEvent, ChangeKind, SourceRoot};
use crate::utils::path::{RelPath, normalize_path};

/// Map a notify event kind. `None` means drop the event.
pub(super) fn change_kind(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Created),
        EventKind::Remove(_) => Some(ChangeKind::Removed),
        // Poll watchers report writes as mtime changes
        EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)) => {
            Some(ChangeKind::Changed)
        }
        // Permission, ownership and access-time noise
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => Some(ChangeKind::Changed),
        _ => None,
    }
}

/// Dotfiles and anything inside a dot-directory, relative to `root`.
pub(super) fn is_ignored(path: &Path, root: &Path) -> bool {
    match RelPath::under(path, root) {
        Some(rel) => rel.is_empty() || rel.is_hidden(),
        None => true,
    }
}

/// Every path of one notify event that survives filtering, as change events.
pub(super) fn translate(
    event: &notify::Event,
    root: SourceRoot,
    root_path: &Path,
) -> Vec<ChangeEvent> {
    let Some(kind) = change_kind(&event.kind) else {
        return Vec::new();
    };

    event
        .paths
        .iter()
        .map(|path| normalize_path(path))
        .filter(|path| !is_ignored(path, root_path))
        .map(|path| ChangeEvent::new(path, kind, root))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, RemoveKind};
    use tempfile::TempDir;

    #[test]
    fn test_change_kind_mapping() {
        assert_eq!(
            change_kind(&EventKind::Create(CreateKind::File)),
            Some(ChangeKind::Created)
        );
        assert_eq!(
            change_kind(&EventKind::Remove(RemoveKind::Any)),
            Some(ChangeKind::Removed)
        );
        assert_eq!(
            change_kind(&EventKind::Modify(ModifyKind::Data(DataChange::Any))),
            Some(ChangeKind::Changed)
        );
        assert_eq!(
            change_kind(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime))),
            Some(ChangeKind::Changed)
        );
        assert_eq!(
            change_kind(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions))),
            None
        );
        assert_eq!(change_kind(&EventKind::Access(AccessKind::Any)), None);
    }

    #[test]
    fn test_dotfiles_are_ignored() {
        let root = Path::new("/p/src");
        assert!(is_ignored(Path::new("/p/src/.env"), root));
        assert!(is_ignored(Path::new("/p/src/.cache/a.ts"), root));
        assert!(is_ignored(Path::new("/p/src"), root));
        assert!(is_ignored(Path::new("/p/other/a.ts"), root));
        assert!(!is_ignored(Path::new("/p/src/lib/a.ts"), root));
    }

    #[test]
    fn test_translate_filters_paths() {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());
        let event = notify::Event::new(EventKind::Create(CreateKind::File))
            .add_path(root.join("a.ts"))
            .add_path(root.join(".a.ts.swp"));

        let events = translate(&event, SourceRoot::Scripts, &root);
        assert_eq!(
            events,
            [ChangeEvent::new(
                root.join("a.ts"),
                ChangeKind::Created,
                SourceRoot::Scripts
            )]
        );

        let chmod = notify::Event::new(EventKind::Modify(ModifyKind::Metadata(
            MetadataKind::Permissions,
        )))
        .add_path(root.join("a.ts"));
        assert!(translate(&chmod, SourceRoot::Scripts, &root).is_empty());
    }
}
