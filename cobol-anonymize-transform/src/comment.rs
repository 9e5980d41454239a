//! Rewrites comment bodies: divider preservation, system-identifier and
//! date scrubbing, Italian personal-name removal, and Italian-to-English
//! business term translation.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// How comment bodies are handled on emit.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CommentMode {
    Preserve,
    Strip,
    Anonymize,
}

static ITALIAN_TERMS: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut terms = vec![
        ("POLIZZA", "POLICY"),
        ("CONTRATTO", "CONTRACT"),
        ("ASSICURATO", "INSURED"),
        ("BENEFICIARIO", "BENEFICIARY"),
        ("PREMIO", "PREMIUM"),
        ("SINISTRO", "CLAIM"),
        ("DENUNCIA", "REPORT"),
        ("RISCHIO", "RISK"),
        ("COPERTURA", "COVERAGE"),
        ("GARANZIA", "WARRANTY"),
        ("QUIETANZA", "RECEIPT"),
        ("SCADENZA", "EXPIRY"),
        ("RINNOVO", "RENEWAL"),
        ("DISDETTA", "CANCELLATION"),
        ("RECESSO", "WITHDRAWAL"),
        ("LIQUIDAZIONE", "SETTLEMENT"),
        ("INDENNIZZO", "COMPENSATION"),
        ("FRANCHIGIA", "DEDUCTIBLE"),
        ("MASSIMALE", "MAXIMUM"),
        ("CAPITALE", "CAPITAL"),
        ("CLIENTE", "CLIENT"),
        ("AGENZIA", "AGENCY"),
        ("AGENTE", "AGENT"),
        ("PRODUTTORE", "PRODUCER"),
        ("INTESTATARIO", "HOLDER"),
        ("CONTRAENTE", "CONTRACTOR"),
        ("TITOLARE", "OWNER"),
        ("ANAGRAFICA", "REGISTRY"),
        ("PORTAFOGLIO", "PORTFOLIO"),
        ("SISTEMA", "SYSTEM"),
        ("PROCEDURA", "PROCEDURE"),
        ("PROGRAMMA", "PROGRAM"),
        ("MODULO", "MODULE"),
        ("FUNZIONE", "FUNCTION"),
        ("ROUTINE", "ROUTINE"),
        ("ELABORAZIONE", "PROCESSING"),
        ("CALCOLO", "CALCULATION"),
        ("VERIFICA", "VERIFICATION"),
        ("CONTROLLO", "CONTROL"),
        ("GESTIONE", "MANAGEMENT"),
        ("DATA", "DATE"),
        ("GIORNO", "DAY"),
        ("MESE", "MONTH"),
        ("ANNO", "YEAR"),
        ("DECORRENZA", "START-DATE"),
        ("EFFETTO", "EFFECT"),
        ("NUMERO", "NUMBER"),
        ("CODICE", "CODE"),
        ("TIPO", "TYPE"),
        ("STATO", "STATUS"),
        ("IMPORTO", "AMOUNT"),
        ("VALORE", "VALUE"),
        ("TOTALE", "TOTAL"),
        ("ERRORE", "ERROR"),
        ("MESSAGGIO", "MESSAGE"),
        ("RISPOSTA", "RESPONSE"),
        ("RICHIESTA", "REQUEST"),
        ("RISULTATO", "RESULT"),
        ("ESITO", "OUTCOME"),
        ("INIZIO", "START"),
        ("FINE", "END"),
        ("PRINCIPALE", "MAIN"),
        ("SECONDARIO", "SECONDARY"),
        ("PRECEDENTE", "PREVIOUS"),
        ("SUCCESSIVO", "NEXT"),
        ("NUOVO", "NEW"),
        ("VECCHIO", "OLD"),
        ("ATTIVO", "ACTIVE"),
        ("INATTIVO", "INACTIVE"),
        ("VALIDO", "VALID"),
        ("INVALIDO", "INVALID"),
        ("AREA", "AREA"),
        ("CAMPO", "FIELD"),
        ("RECORD", "RECORD"),
        ("TABELLA", "TABLE"),
        ("CHIAVE", "KEY"),
        ("INDICE", "INDEX"),
        ("CONTATORE", "COUNTER"),
        ("FLAG", "FLAG"),
        ("INDICATORE", "INDICATOR"),
        ("DESCRIZIONE", "DESCRIPTION"),
        ("LUNGHEZZA", "LENGTH"),
        ("POSIZIONE", "POSITION"),
        ("FORMATO", "FORMAT"),
        ("SEZIONE", "SECTION"),
        ("DIVISIONE", "DIVISION"),
        ("PARAGRAFO", "PARAGRAPH"),
        ("RIGA", "LINE"),
        ("COLONNA", "COLUMN"),
        ("CARATTERE", "CHARACTER"),
        ("STRINGA", "STRING"),
        ("NUMERICO", "NUMERIC"),
        ("ALFABETICO", "ALPHABETIC"),
    ];
    // Longest-first so a long term is substituted before a shorter term
    // that happens to be one of its substrings gets a chance to match.
    terms.sort_by_key(|(it, _)| std::cmp::Reverse(it.len()));
    terms
});

static PERSONAL_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "MASON", "LUPO", "ROSSI", "BIANCHI", "FERRARI", "RUSSO", "ESPOSITO", "ROMANO",
        "COLOMBO", "RICCI", "MARINO", "GRECO", "BRUNO", "GALLO", "CONTI", "LEONE", "COSTA",
        "GIORDANO", "MANCINI", "RIZZO", "LOMBARDI", "MORETTI", "BARBIERI", "FONTANA",
        "SANTORO", "CARUSO", "MARIANI", "RINALDI", "MARCO", "LUCA", "ANDREA", "FRANCESCO",
        "GIUSEPPE", "GIOVANNI", "ANTONIO", "LUIGI", "MARIO", "PAOLO", "MARIA", "ANNA",
        "GIULIA", "SARA", "LAURA", "ELENA", "FRANCESCA", "CHIARA", "SILVIA", "VALENTINA",
    ]
    .into_iter()
    .collect()
});

static SYSTEM_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:CRQ|INC|CHG|PRB|REQ|SR)\d{9,15}\b").unwrap()
});
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\b\d{2}/\d{2}/\d{4}\b").unwrap(),
        Regex::new(r"\b\d{4}/\d{2}/\d{2}\b").unwrap(),
        Regex::new(r"\b\d{2}-\d{2}-\d{4}\b").unwrap(),
        Regex::new(r"\b\d{8}\b").unwrap(),
    ]
});

/// Rewrites comment bodies (the text after column 7) according to
/// `mode`. One instance per file: the personal-name counter is
/// monotonically increasing across the file's comments.
pub struct CommentRewriter {
    mode: CommentMode,
    name_counter: u32,
}

impl CommentRewriter {
    pub fn new(mode: CommentMode) -> Self {
        Self {
            mode,
            name_counter: 0,
        }
    }

    pub fn rewrite(&mut self, body: &str) -> String {
        if is_divider(body) {
            return body.to_string();
        }

        match self.mode {
            CommentMode::Preserve => body.to_string(),
            CommentMode::Strip => String::new(),
            CommentMode::Anonymize => {
                let scrubbed = scrub_system_ids(body);
                let (named, consumed) = self.remove_personal_names(&scrubbed);
                self.name_counter += consumed;
                translate_italian_terms(&named)
            }
        }
    }

    fn remove_personal_names(&self, text: &str) -> (String, u32) {
        let mut result = text.to_string();
        let mut counter = self.name_counter;
        let mut consumed = 0;
        for name in PERSONAL_NAMES.iter() {
            let pattern = whole_word_pattern(name);
            if pattern.is_match(&result) {
                let replacement = format!("USER{counter:03}");
                result = pattern.replace_all(&result, replacement.as_str()).to_string();
                counter += 1;
                consumed += 1;
            }
        }
        (result, consumed)
    }
}

/// Mirrors the 3-character-minimum/5-character-divider heuristic: empty,
/// or at least 5 characters with at most 2 alphanumerics drawn from a
/// closed symbol set, or at least 3 characters with at most 2
/// alphanumerics overall.
fn is_divider(body: &str) -> bool {
    let text = body.trim();
    if text.is_empty() {
        return true;
    }
    let alnum_count = text.chars().filter(|c| c.is_alphanumeric()).count();
    if alnum_count <= 2 && text.chars().count() >= 3 {
        return true;
    }
    let unique: HashSet<char> = text.chars().collect();
    if unique.len() <= 3 && text.chars().count() >= 5 && text.chars().all(|c| "-*=+#_|/".contains(c)) {
        return true;
    }
    false
}

fn scrub_system_ids(text: &str) -> String {
    let text = SYSTEM_ID_PATTERN.replace_all(text, "XXXXXXXX").to_string();
    let mut text = text;
    for pattern in DATE_PATTERNS.iter() {
        text = pattern.replace_all(&text, "XXXXXXXX").to_string();
    }
    text
}

fn translate_italian_terms(text: &str) -> String {
    let mut result = text.to_string();
    for (italian, english) in ITALIAN_TERMS.iter() {
        let pattern = whole_word_pattern(italian);
        if pattern.is_match(&result) {
            result = pattern.replace_all(&result, *english).to_string();
        }
    }
    result
}

fn whole_word_pattern(word: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word))).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divider_lines_are_preserved() {
        assert!(is_divider(""));
        assert!(is_divider("-----------"));
        assert!(is_divider("***********"));
    }

    #[test]
    fn system_id_and_name_and_italian_term_are_rewritten() {
        let mut rewriter = CommentRewriter::new(CommentMode::Anonymize);
        let out = rewriter.rewrite(" GESTIONE POLIZZA - MASON - CRQ000002478171");
        assert!(out.contains("MANAGEMENT"));
        assert!(out.contains("POLICY"));
        assert!(out.contains("USER000"));
        assert!(out.contains("XXXXXXXX"));
        assert!(!out.contains("MASON"));
    }

    #[test]
    fn strip_mode_preserves_dividers_but_empties_content() {
        let mut rewriter = CommentRewriter::new(CommentMode::Strip);
        assert_eq!(rewriter.rewrite("-----"), "-----");
        assert_eq!(rewriter.rewrite(" some content here"), "");
    }

    #[test]
    fn preserve_mode_is_a_no_op() {
        let mut rewriter = CommentRewriter::new(CommentMode::Preserve);
        assert_eq!(rewriter.rewrite(" GESTIONE CLIENTE"), " GESTIONE CLIENTE");
    }
}
