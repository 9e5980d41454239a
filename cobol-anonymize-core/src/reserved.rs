//! The closed vocabulary of COBOL-85/2002/IBM-extension reserved words,
//! figurative constants, special registers, and CICS/DB2 system
//! identifiers. All lookups are O(1) and case-insensitive.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// What a name is classified as against the closed vocabulary sets.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum WordCategory {
    Figurative,
    SpecialRegister,
    Reserved,
    UserDefined,
}

/// Roughly 500 COBOL-85, COBOL-2002, and IBM-extension keywords, plus
/// figurative constants (which are also reserved).
static RESERVED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // A
        "ACCEPT", "ACCESS", "ADD", "ADDRESS", "ADVANCING", "AFTER", "ALL",
        "ALLOCATE", "ALPHABET", "ALPHABETIC", "ALPHABETIC-LOWER", "ALPHABETIC-UPPER",
        "ALPHANUMERIC", "ALPHANUMERIC-EDITED", "ALSO", "ALTER", "ALTERNATE",
        "AND", "ANY", "APPLY", "ARE", "AREA", "AREAS", "ASCENDING", "ASSIGN",
        "AT", "AUTHOR",
        // B
        "BEFORE", "BEGINNING", "BINARY", "BINARY-CHAR", "BINARY-DOUBLE",
        "BINARY-LONG", "BINARY-SHORT", "BLANK", "BLOCK", "BOOLEAN", "BOTTOM", "BY",
        // C
        "CALL", "CANCEL", "CBL", "CD", "CF", "CH", "CHARACTER", "CHARACTERS",
        "CLASS", "CLASS-ID", "CLOCK-UNITS", "CLOSE", "COBOL", "CODE",
        "CODE-SET", "COLLATING", "COLUMN", "COMMA", "COMMIT", "COMMON",
        "COMMUNICATION", "COMP", "COMP-1", "COMP-2", "COMP-3", "COMP-4",
        "COMP-5", "COMPUTATIONAL", "COMPUTATIONAL-1", "COMPUTATIONAL-2",
        "COMPUTATIONAL-3", "COMPUTATIONAL-4", "COMPUTATIONAL-5", "COMPUTE",
        "CONFIGURATION", "CONTAINS", "CONTENT", "CONTINUE", "CONTROL",
        "CONTROLS", "CONVERTING", "COPY", "CORR", "CORRESPONDING", "COUNT",
        "CRT", "CURRENCY", "CURSOR",
        // D
        "DATA", "DATE", "DATE-COMPILED", "DATE-WRITTEN", "DAY", "DAY-OF-WEEK",
        "DBCS", "DE", "DEBUG-CONTENTS", "DEBUG-ITEM", "DEBUG-LINE", "DEBUG-NAME",
        "DEBUG-SUB-1", "DEBUG-SUB-2", "DEBUG-SUB-3", "DEBUGGING", "DECIMAL-POINT",
        "DECLARATIVES", "DEFAULT", "DELETE", "DELIMITED", "DELIMITER",
        "DEPENDING", "DESCENDING", "DESTINATION", "DETAIL", "DISABLE", "DISPLAY",
        "DISPLAY-1", "DIVIDE", "DIVISION", "DOWN", "DUPLICATES", "DYNAMIC",
        // E
        "EBCDIC", "EGCS", "EGI", "EJECT", "ELSE", "EMI", "ENABLE", "END",
        "END-ADD", "END-CALL", "END-COMPUTE", "END-DELETE", "END-DISPLAY",
        "END-DIVIDE", "END-EVALUATE", "END-EXEC", "END-IF", "END-INVOKE",
        "END-MULTIPLY", "END-OF-PAGE", "END-PERFORM", "END-READ", "END-RECEIVE",
        "END-RETURN", "END-REWRITE", "END-SEARCH", "END-START", "END-STRING",
        "END-SUBTRACT", "END-UNSTRING", "END-WRITE", "ENDING", "ENTER",
        "ENTRY", "ENVIRONMENT", "EOP", "EQUAL", "ERROR", "ESI", "EVALUATE",
        "EVERY", "EXCEPTION", "EXEC", "EXECUTE", "EXIT", "EXTEND", "EXTERNAL",
        // F
        "FACTORY", "FALSE", "FD", "FILE", "FILE-CONTROL", "FILLER", "FINAL",
        "FIRST", "FLOAT-EXTENDED", "FLOAT-LONG", "FLOAT-SHORT", "FOOTING",
        "FOR", "FORMAT", "FREE", "FROM", "FULL", "FUNCTION", "FUNCTION-ID",
        // G
        "GENERATE", "GIVING", "GLOBAL", "GO", "GOBACK", "GREATER", "GROUP",
        "GROUP-USAGE",
        // H
        "HEADING", "HIGH-VALUE", "HIGH-VALUES",
        // I
        "ID", "IDENTIFICATION", "IF", "IN", "INDEX", "INDEXED", "INDICATE",
        "INHERITS", "INITIAL", "INITIALIZE", "INITIATE", "INPUT", "INPUT-OUTPUT",
        "INSPECT", "INSTALLATION", "INTERFACE", "INTERFACE-ID", "INTO",
        "INVALID", "INVOKE", "IS",
        // J
        "JUST", "JUSTIFIED",
        // K
        "KANJI", "KEY",
        // L
        "LABEL", "LAST", "LEADING", "LEFT", "LENGTH", "LESS", "LIMIT",
        "LIMITS", "LINAGE", "LINAGE-COUNTER", "LINE", "LINE-COUNTER", "LINES",
        "LINKAGE", "LOCAL-STORAGE", "LOCALE", "LOCK", "LOW-VALUE", "LOW-VALUES",
        // M
        "MEMORY", "MERGE", "MESSAGE", "METHOD", "METHOD-ID", "MINUS", "MODE",
        "MODULES", "MORE-LABELS", "MOVE", "MULTIPLE", "MULTIPLY",
        // N
        "NATIONAL", "NATIONAL-EDITED", "NATIVE", "NEGATIVE", "NESTED", "NEXT",
        "NO", "NOT", "NULL", "NULLS", "NUMBER", "NUMERIC", "NUMERIC-EDITED",
        // O
        "OBJECT", "OBJECT-COMPUTER", "OBJECT-REFERENCE", "OCCURS", "OF", "OFF",
        "OMITTED", "ON", "OPEN", "OPTIONAL", "OPTIONS", "OR", "ORDER",
        "ORGANIZATION", "OTHER", "OUTPUT", "OVERFLOW", "OVERRIDE",
        // P
        "PACKED-DECIMAL", "PADDING", "PAGE", "PAGE-COUNTER", "PARAGRAPH",
        "PASSWORD", "PERFORM", "PF", "PH", "PIC", "PICTURE", "PLUS", "POINTER",
        "POSITION", "POSITIVE", "PRESENT", "PRINTING", "PROCEDURE",
        "PROCEDURE-POINTER", "PROCEDURES", "PROCEED", "PROCESSING", "PROGRAM",
        "PROGRAM-ID", "PROGRAM-POINTER", "PROPERTY", "PROTOTYPE", "PURGE",
        // Q
        "QUEUE", "QUOTE", "QUOTES",
        // R
        "RAISE", "RAISING", "RANDOM", "RD", "READ", "READY", "RECEIVE",
        "RECORD", "RECORDING", "RECORDS", "RECURSIVE", "REDEFINES", "REEL",
        "REFERENCE", "REFERENCES", "RELATIVE", "RELEASE", "RELOAD", "REMAINDER",
        "REMOVAL", "RENAMES", "REPLACE", "REPLACING", "REPORT", "REPORTING",
        "REPORTS", "REPOSITORY", "RERUN", "RESERVE", "RESET", "RESUME",
        "RETRY", "RETURN", "RETURN-CODE", "RETURNING", "REVERSED", "REWIND",
        "REWRITE", "RF", "RH", "RIGHT", "ROLLBACK", "ROUNDED", "RUN",
        // S
        "SAME", "SCREEN", "SD", "SEARCH", "SECTION", "SECURE", "SECURITY",
        "SEGMENT", "SEGMENT-LIMIT", "SELECT", "SELF", "SEND", "SENTENCE",
        "SEPARATE", "SEQUENCE", "SEQUENTIAL", "SERVICE", "SET", "SHARING",
        "SHIFT-IN", "SHIFT-OUT", "SIGN", "SIZE", "SKIP1", "SKIP2", "SKIP3",
        "SORT", "SORT-CONTROL", "SORT-CORE-SIZE", "SORT-FILE-SIZE",
        "SORT-MERGE", "SORT-MESSAGE", "SORT-MODE-SIZE", "SORT-RETURN",
        "SOURCE", "SOURCE-COMPUTER", "SOURCES", "SPACE", "SPACES",
        "SPECIAL-NAMES", "SQL", "SQLCA", "SQLCODE", "SQLIMS", "SQLIMSCA",
        "SQLSTATE", "STANDARD", "STANDARD-1", "STANDARD-2", "START",
        "STATUS", "STOP", "STRING", "SUB-QUEUE-1", "SUB-QUEUE-2",
        "SUB-QUEUE-3", "SUBTRACT", "SUM", "SUPER", "SUPPRESS", "SYMBOLIC",
        "SYNC", "SYNCHRONIZED", "SYSTEM-DEFAULT",
        // T
        "TABLE", "TALLY", "TALLYING", "TAPE", "TERMINAL", "TERMINATE", "TEST",
        "TEXT", "THAN", "THEN", "THROUGH", "THRU", "TIME", "TIMES", "TITLE",
        "TO", "TOP", "TRACE", "TRAILING", "TRUE", "TYPE", "TYPEDEF",
        // U
        "UNBOUNDED", "UNIT", "UNIVERSAL", "UNLOCK", "UNSTRING", "UNTIL", "UP",
        "UPON", "USAGE", "USE", "USER-DEFAULT", "USING",
        // V
        "VALIDATE", "VALIDATING", "VALUE", "VALUES", "VARYING",
        // W
        "WHEN", "WHEN-COMPILED", "WITH", "WORDS", "WORKING-STORAGE", "WRITE",
        // X/Y/Z
        "XML", "XML-CODE", "XML-EVENT", "XML-INFORMATION", "XML-NAMESPACE",
        "XML-NAMESPACE-PREFIX", "XML-NNAMESPACE", "XML-NNAMESPACE-PREFIX",
        "XML-NTEXT", "XML-SCHEMA", "XML-TEXT",
        "ZERO", "ZEROES", "ZEROS",
        // IBM/MF extensions
        "GOBACK", "EXEC", "SQL", "END-EXEC", "CICS",
        "DFHCOMMAREA", "DFHEIBLK", "DFHRESP", "EIBCALEN", "EIBRESP",
        // figurative constants (also reserved)
        "SPACE", "SPACES", "ZERO", "ZEROS", "ZEROES", "HIGH-VALUE",
        "HIGH-VALUES", "LOW-VALUE", "LOW-VALUES", "QUOTE", "QUOTES",
        "NULL", "NULLS",
    ]
    .into_iter()
    .collect()
});

static FIGURATIVE_CONSTANTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "SPACE", "SPACES", "ZERO", "ZEROS", "ZEROES", "HIGH-VALUE",
        "HIGH-VALUES", "LOW-VALUE", "LOW-VALUES", "QUOTE", "QUOTES",
        "NULL", "NULLS",
    ]
    .into_iter()
    .collect()
});

static SPECIAL_REGISTERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ADDRESS", "DEBUG-ITEM", "LENGTH", "LINAGE-COUNTER", "LINE-COUNTER",
        "PAGE-COUNTER", "RETURN-CODE", "SHIFT-IN", "SHIFT-OUT", "SORT-CONTROL",
        "SORT-CORE-SIZE", "SORT-FILE-SIZE", "SORT-MESSAGE", "SORT-MODE-SIZE",
        "SORT-RETURN", "TALLY", "WHEN-COMPILED", "XML-CODE", "XML-EVENT",
        "XML-INFORMATION", "XML-NAMESPACE", "XML-NAMESPACE-PREFIX",
        "XML-NNAMESPACE", "XML-NNAMESPACE-PREFIX", "XML-NTEXT", "XML-TEXT",
    ]
    .into_iter()
    .collect()
});

/// CICS/DB2 interface names: exact matches plus anything starting with
/// `EIB` (the CICS Execute Interface Block field family).
static SYSTEM_IDENTIFIERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "DFHCOMMAREA", "DFHEIBLK", "DFHRESP", "DFHVALUE",
        "EIBAID", "EIBCALEN", "EIBCPOSN", "EIBDATE", "EIBDS", "EIBFN",
        "EIBFREE", "EIBRCODE", "EIBREQID", "EIBRESP", "EIBRESP2", "EIBRSRCE",
        "EIBSYNC", "EIBTASKN", "EIBTIME", "EIBTRMID", "EIBTRNID",
        "SQLCA", "SQLCODE", "SQLERRMC", "SQLERRML", "SQLERRD", "SQLSTATE",
        "SQLWARN",
    ]
    .into_iter()
    .collect()
});

pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(word.to_uppercase().as_str())
}

pub fn is_figurative(word: &str) -> bool {
    FIGURATIVE_CONSTANTS.contains(word.to_uppercase().as_str())
}

pub fn is_special_register(word: &str) -> bool {
    SPECIAL_REGISTERS.contains(word.to_uppercase().as_str())
}

pub fn is_system(word: &str) -> bool {
    let upper = word.to_uppercase();
    SYSTEM_IDENTIFIERS.contains(upper.as_str()) || upper.starts_with("EIB")
}

pub fn category(word: &str) -> WordCategory {
    if is_figurative(word) {
        WordCategory::Figurative
    } else if is_special_register(word) {
        WordCategory::SpecialRegister
    } else if is_reserved(word) {
        WordCategory::Reserved
    } else {
        WordCategory::UserDefined
    }
}

/// Whether `word` is `FILLER` (case-insensitive); `FILLER` items are
/// classified but never mapped.
pub fn is_filler(word: &str) -> bool {
    word.eq_ignore_ascii_case("FILLER")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_is_case_insensitive() {
        assert!(is_reserved("move"));
        assert!(is_reserved("MOVE"));
        assert!(is_reserved("MoVe"));
        assert!(!is_reserved("WS-FIELD"));
    }

    #[test]
    fn figurative_and_special_register_disjoint_from_user_defined() {
        assert_eq!(category("SPACES"), WordCategory::Figurative);
        assert_eq!(category("RETURN-CODE"), WordCategory::SpecialRegister);
        assert_eq!(category("MOVE"), WordCategory::Reserved);
        assert_eq!(category("WS-CUSTOMER-NAME"), WordCategory::UserDefined);
    }

    #[test]
    fn system_identifier_prefix_family() {
        assert!(is_system("EIBCALEN"));
        assert!(is_system("EIBFOOBAR"));
        assert!(is_system("SQLCODE"));
        assert!(!is_system("WS-EIB-COUNT"));
    }

    #[test]
    fn filler_is_recognized_case_insensitively() {
        assert!(is_filler("FILLER"));
        assert!(is_filler("filler"));
        assert!(is_reserved("FILLER"));
        assert!(!is_filler("WS-FIELD"));
    }
}
