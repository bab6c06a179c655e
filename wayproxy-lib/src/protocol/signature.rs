//! Signature strings: the per-method argument-type string taken from the
//! Wayland protocol description, e.g. `"2uo?sn"` (a version marker, an
//! unsigned int, a nullable object, a string, a new_id).

/// The kind of one decoded argument, drawn from `{i,u,f,s,o,n,a,h}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Int,
    Uint,
    Fixed,
    String,
    Object,
    NewId,
    Array,
    Fd,
}

/// One argument slot in a parsed signature: its kind and whether it carries
/// the `?` nullability marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigArg {
    pub kind: ArgKind,
    pub nullable: bool,
}

/// Parse a signature string into its argument slots, skipping leading
/// version digits and recording the `?` marker per argument.
///
/// Unrecognised characters are skipped with a logged warning at the call
/// site (see [`crate::protocol::dispatch`]); this function itself never
/// fails, matching the reference implementation's tolerance of
/// protocol-description characters it doesn't special-case.
pub fn parse_signature(sig: &str) -> Vec<SigArg> {
    let mut out = Vec::new();
    let mut nullable_pending = false;
    for c in sig.chars() {
        if c.is_ascii_digit() {
            continue;
        }
        if c == '?' {
            nullable_pending = true;
            continue;
        }
        let kind = match c {
            'i' => ArgKind::Int,
            'u' => ArgKind::Uint,
            'f' => ArgKind::Fixed,
            's' => ArgKind::String,
            'o' => ArgKind::Object,
            'n' => ArgKind::NewId,
            'a' => ArgKind::Array,
            'h' => ArgKind::Fd,
            _ => {
                nullable_pending = false;
                continue;
            }
        };
        out.push(SigArg { kind, nullable: nullable_pending });
        nullable_pending = false;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_signature() {
        let parsed = parse_signature("uo?sn");
        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed[0].kind, ArgKind::Uint);
        assert_eq!(parsed[1].kind, ArgKind::Object);
        assert_eq!(parsed[2].kind, ArgKind::String);
        assert_eq!(parsed[3].kind, ArgKind::NewId);
    }

    #[test]
    fn skips_version_digits() {
        let parsed = parse_signature("2u3o");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].kind, ArgKind::Uint);
        assert_eq!(parsed[1].kind, ArgKind::Object);
    }

    #[test]
    fn empty_signature_has_no_args() {
        assert!(parse_signature("").is_empty());
    }
}
