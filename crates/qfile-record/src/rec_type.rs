//! Queue-file record types.
//!
//! Only [`PTR`], [`DTXT`] and [`END`] mean anything to the codec itself;
//! the rest are carried through unchanged and interpreted by the queue-file
//! layer. Envelope and content segments reuse some letters ([`FILT`] and
//! [`CONT`] are both `'L'`).

/// Message size and offsets.
pub const SIZE: u8 = b'C';
/// Arrival time.
pub const TIME: u8 = b'T';
/// Creation time.
pub const CTIME: u8 = b'c';
/// Sender full name.
pub const FULL: u8 = b'F';
/// Inspector transport.
pub const INSP: u8 = b'I';
/// Content filter transport.
pub const FILT: u8 = b'L';
/// Sender address.
pub const FROM: u8 = b'S';
/// Completed recipient.
pub const DONE: u8 = b'D';
/// Recipient deleted by a filter.
pub const DRCP: u8 = b'@';
/// Recipient address.
pub const RCPT: u8 = b'R';
/// Original recipient address.
pub const ORCP: u8 = b'O';
/// DSN full/headers flag.
pub const DSN_RET: u8 = b'<';
/// DSN envelope id.
pub const DSN_ENVID: u8 = b'i';
/// DSN original recipient.
pub const DSN_ORCPT: u8 = b'o';
/// DSN notify flags.
pub const DSN_NOTIFY: u8 = b'n';
/// Start of message content.
pub const MESG: u8 = b'M';
/// Unterminated content line.
pub const CONT: u8 = b'L';
/// Normal content line.
pub const NORM: u8 = b'N';
/// Deleted text, retained but logically removed.
pub const DTXT: u8 = b'w';
/// Start of extracted information.
pub const XTRA: u8 = b'X';
/// Return-receipt-to address.
pub const RRTO: u8 = b'r';
/// Errors-to address.
pub const ERTO: u8 = b'e';
/// Priority.
pub const PRIO: u8 = b'P';
/// Pointer to another file offset.
pub const PTR: u8 = b'p';
/// VERP delimiters.
pub const VERP: u8 = b'V';
/// Warning time.
pub const WARN: u8 = b'W';
/// Named attribute.
pub const ATTR: u8 = b'A';
/// Kill flag.
pub const KILL: u8 = b'K';
/// Redirect target.
pub const RDR: u8 = b'>';
/// Processing flags.
pub const FLGS: u8 = b'f';
/// Milter count.
pub const MILT_COUNT: u8 = b'm';
/// End of a logical segment.
pub const END: u8 = b'E';

const NAMES: &[(u8, &str)] = &[
    (SIZE, "message_size"),
    (TIME, "message_arrival_time"),
    (CTIME, "queue_file_creation_time"),
    (FULL, "sender_fullname"),
    (INSP, "content_inspector"),
    (FILT, "content_filter"),
    (FROM, "sender"),
    (DONE, "done_recipient"),
    (DRCP, "canceled_recipient"),
    (RCPT, "recipient"),
    (ORCP, "original_recipient"),
    (DSN_RET, "dsn_return_flags"),
    (DSN_ENVID, "dsn_envelope_id"),
    (DSN_ORCPT, "dsn_original_recipient"),
    (DSN_NOTIFY, "dsn_notify_flags"),
    (MESG, "message_content"),
    (NORM, "regular_text"),
    (DTXT, "padding"),
    (XTRA, "extracted_info"),
    (RRTO, "return_receipt"),
    (ERTO, "errors_to"),
    (PRIO, "priority"),
    (PTR, "pointer_record"),
    (VERP, "verp_delimiters"),
    (WARN, "warning_message_time"),
    (ATTR, "named_attribute"),
    (KILL, "killed_record"),
    (RDR, "redirect_to"),
    (FLGS, "flags"),
    (MILT_COUNT, "milter_count"),
    (END, "message_end"),
];

/// Human-readable name for a record type, `"unknown"` if it has none.
pub fn type_name(rec_type: u8) -> &'static str {
    NAMES
        .iter()
        .find(|(value, _)| *value == rec_type)
        .map(|(_, name)| *name)
        .unwrap_or("unknown")
}

/// Look up a record type by its constant name, e.g. `"PTR"` or `"dtxt"`.
pub fn from_name(name: &str) -> Option<u8> {
    let rec_type = match name.to_ascii_uppercase().as_str() {
        "SIZE" => SIZE,
        "TIME" => TIME,
        "CTIME" => CTIME,
        "FULL" => FULL,
        "INSP" => INSP,
        "FILT" => FILT,
        "FROM" => FROM,
        "DONE" => DONE,
        "DRCP" => DRCP,
        "RCPT" => RCPT,
        "ORCP" => ORCP,
        "DSN_RET" => DSN_RET,
        "DSN_ENVID" => DSN_ENVID,
        "DSN_ORCPT" => DSN_ORCPT,
        "DSN_NOTIFY" => DSN_NOTIFY,
        "MESG" => MESG,
        "CONT" => CONT,
        "NORM" => NORM,
        "DTXT" => DTXT,
        "XTRA" => XTRA,
        "RRTO" => RRTO,
        "ERTO" => ERTO,
        "PRIO" => PRIO,
        "PTR" => PTR,
        "VERP" => VERP,
        "WARN" => WARN,
        "ATTR" => ATTR,
        "KILL" => KILL,
        "RDR" => RDR,
        "FLGS" => FLGS,
        "MILT_COUNT" => MILT_COUNT,
        "END" => END,
        _ => return None,
    };
    Some(rec_type)
}
