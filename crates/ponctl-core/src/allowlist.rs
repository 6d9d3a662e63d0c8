// ── Allow/deny list file parsing ──
//
// Line-oriented batch files. Allow-list lines carry a serial number and
// optional trailing service-profile names; deny-list lines carry a
// serial number first. Fields may be separated by spaces, tabs, or
// commas. Malformed lines are logged and skipped, never fatal.

use std::io::BufRead;

use tracing::warn;

use crate::error::CoreError;
use crate::model::SerialNumber;

/// Upper bound on service profiles carried per allow-list line.
pub const MAX_SERVICES_PER_ONU: usize = 6;

/// One parsed allow-list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowListEntry {
    pub serial: SerialNumber,
    pub services: Vec<String>,
}

/// Parse an allow-list: `serial-number [service-profile ...]` per line.
///
/// Short-form serials are normalized; lines whose first field is not a
/// serial number are skipped with a warning. At most
/// [`MAX_SERVICES_PER_ONU`] services are kept per line.
pub fn parse_allow_list<R: BufRead>(reader: R) -> Result<Vec<AllowListEntry>, CoreError> {
    let mut entries = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let mut fields = tokenize(&line);
        let Some(first) = fields.next() else {
            continue;
        };
        let serial = match SerialNumber::parse(first) {
            Ok(serial) => serial,
            Err(err) => {
                warn!(line = number + 1, %err, "skipping malformed allow-list line");
                continue;
            }
        };
        let services: Vec<String> = fields
            .take(MAX_SERVICES_PER_ONU)
            .map(str::to_owned)
            .collect();
        entries.push(AllowListEntry { serial, services });
    }
    Ok(entries)
}

/// Parse a deny-list: one serial number as the first field of each
/// line. Malformed lines are skipped; an entirely empty result is an
/// input error.
pub fn parse_deny_list<R: BufRead>(reader: R) -> Result<Vec<SerialNumber>, CoreError> {
    let mut serials = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(first) = tokenize(&line).next() else {
            continue;
        };
        match SerialNumber::parse(first) {
            Ok(serial) => serials.push(serial),
            Err(err) => {
                warn!(line = number + 1, %err, "skipping malformed deny-list line");
            }
        }
    }
    if serials.is_empty() {
        return Err(CoreError::InvalidInput {
            message: "deny-list contains no usable serial numbers".to_owned(),
        });
    }
    Ok(serials)
}

fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    line.split([' ', '\t', ',']).filter(|field| !field.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sn(raw: &str) -> SerialNumber {
        SerialNumber::parse(raw).unwrap()
    }

    #[test]
    fn allow_list_parses_serials_and_services() {
        let input = "ISKT00000001 HSI IPTV\n3C9A5F21\tVOIP\n";
        let entries = parse_allow_list(input.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].serial, sn("ISKT00000001"));
        assert_eq!(entries[0].services, ["HSI".to_owned(), "IPTV".to_owned()]);
        assert_eq!(entries[1].serial, sn("ISKT3C9A5F21"));
        assert_eq!(entries[1].services, ["VOIP".to_owned()]);
    }

    #[test]
    fn allow_list_is_comma_tolerant() {
        let entries = parse_allow_list("ISKT00000001,HSI,IPTV\n".as_bytes()).unwrap();
        assert_eq!(entries[0].services, ["HSI".to_owned(), "IPTV".to_owned()]);
    }

    #[test]
    fn allow_list_skips_malformed_and_blank_lines() {
        let input = "\nbogus-serial HSI\nISKT00000001\n   \n";
        let entries = parse_allow_list(input.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].serial, sn("ISKT00000001"));
        assert!(entries[0].services.is_empty());
    }

    #[test]
    fn allow_list_caps_services_per_line() {
        let input = "ISKT00000001 A B C D E F G H\n";
        let entries = parse_allow_list(input.as_bytes()).unwrap();
        assert_eq!(entries[0].services.len(), MAX_SERVICES_PER_ONU);
        assert_eq!(entries[0].services.last().unwrap(), "F");
    }

    #[test]
    fn deny_list_takes_the_first_field() {
        let input = "ISKT00000001 trailing junk\n3C9A5F21\n";
        let serials = parse_deny_list(input.as_bytes()).unwrap();
        assert_eq!(serials, [sn("ISKT00000001"), sn("ISKT3C9A5F21")]);
    }

    #[test]
    fn deny_list_with_no_usable_entries_is_an_error() {
        let err = parse_deny_list("nonsense\n\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput { .. }));
    }
}
