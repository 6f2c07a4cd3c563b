//! Unit tests for the identifier newtypes
//!
//! Tests cover creation, parsing, conversion, display formatting and the
//! abbreviated form shown in claim tables.

use core_kernel::{
    UserId, PolicyId, ClaimId, ClaimItemId, AttachmentId,
    NoteId, AssignmentId, AuditEventId,
};
use uuid::Uuid;

mod claim_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = ClaimId::new();
        let id2 = ClaimId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = ClaimId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = ClaimId::new_v7();
        assert!(id1 < id2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = ClaimId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_from_str_with_and_without_prefix() {
        let original = ClaimId::new();
        let with_prefix: ClaimId = original.to_string().parse().unwrap();
        let bare: ClaimId = original.as_uuid().to_string().parse().unwrap();
        assert_eq!(original, with_prefix);
        assert_eq!(original, bare);
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!("CLM-not-a-uuid".parse::<ClaimId>().is_err());
    }

    #[test]
    fn test_short_is_eight_hex_digits_and_ellipsis() {
        let id = ClaimId::new();
        let short = id.short();
        assert_eq!(short.len(), 11);
        assert!(short.ends_with("..."));
        assert!(id.as_uuid().to_string().starts_with(&short[..8]));
    }

    #[test]
    fn test_json_is_bare_uuid() {
        let id = ClaimId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
        let back: ClaimId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

mod prefixes {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert_eq!(UserId::prefix(), "USR");
        assert_eq!(PolicyId::prefix(), "POL");
        assert_eq!(ClaimId::prefix(), "CLM");
        assert_eq!(ClaimItemId::prefix(), "CLMI");
        assert_eq!(AttachmentId::prefix(), "ATT");
        assert_eq!(NoteId::prefix(), "NOTE");
        assert_eq!(AssignmentId::prefix(), "ASN");
        assert_eq!(AuditEventId::prefix(), "AUD");
    }

    #[test]
    fn test_display_uses_prefix() {
        assert!(UserId::new().to_string().starts_with("USR-"));
        assert!(NoteId::new().to_string().starts_with("NOTE-"));
    }

    #[test]
    fn test_uuid_round_trip() {
        let uuid = Uuid::new_v4();
        let id: AttachmentId = uuid.into();
        let back: Uuid = id.into();
        assert_eq!(uuid, back);
    }
}
