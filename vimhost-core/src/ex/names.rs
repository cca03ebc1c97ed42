//! Command-name recognition and abbreviation expansion.

/// The closed table of `(full name, shortest abbreviation)` pairs, in match
/// order. An empty abbreviation means the full name is the only accepted
/// form.
const COMMAND_NAMES: &[(&str, &str)] = &[
    ("close", "clo"),
    ("delete", "d"),
    ("display", "di"),
    ("edit", "e"),
    ("exit", "exi"),
    ("fold", "fo"),
    ("join", "j"),
    ("make", "mak"),
    ("marks", ""),
    ("nohlsearch", "noh"),
    ("put", "pu"),
    ("quit", "q"),
    ("qall", "qa"),
    ("quitall", "quita"),
    ("redo", "red"),
    ("registers", "reg"),
    ("retab", "ret"),
    ("set", "se"),
    ("source", "so"),
    ("split", "sp"),
    ("substitute", "s"),
    ("smagic", "sm"),
    ("snomagic", "sno"),
    ("tabfirst", "tabfir"),
    ("tablast", "tabl"),
    ("tabnext", "tabn"),
    ("tabNext", "tabN"),
    ("tabprevious", "tabp"),
    ("tabrewind", "tabr"),
    ("undo", "u"),
    ("wq", ""),
    ("xit", "x"),
    ("yank", "y"),
    // map family
    ("map", ""),
    ("nmap", "nm"),
    ("vmap", "vm"),
    ("xmap", "xm"),
    ("smap", ""),
    ("omap", "om"),
    ("imap", "im"),
    ("lmap", "lm"),
    ("cmap", "cm"),
    ("noremap", "no"),
    ("nnoremap", "nn"),
    ("vnoremap", "vn"),
    ("xnoremap", "xn"),
    ("snoremap", "snor"),
    ("onoremap", "ono"),
    ("inoremap", "ino"),
    ("lnoremap", "ln"),
    ("cnoremap", "cno"),
    ("unmap", "unm"),
    ("nunmap", "nun"),
    ("vunmap", "vu"),
    ("xunmap", "xu"),
    ("sunmap", "sunm"),
    ("ounmap", "ou"),
    ("iunmap", "iu"),
    ("lunmap", "lu"),
    ("cunmap", "cu"),
    ("mapclear", "mapc"),
    ("nmapclear", "nmapc"),
    ("vmapclear", "vmapc"),
    ("xmapclear", "xmapc"),
    ("smapclear", "smapc"),
    ("omapclear", "omapc"),
    ("imapclear", "imapc"),
    ("lmapclear", "lmapc"),
    ("cmapclear", "cmapc"),
    // single-glyph commands
    ("/", ""),
    ("?", ""),
    ("<", ""),
    (">", ""),
    ("&", ""),
    ("~", ""),
];

/// Expands an abbreviated command name to its canonical full form.
///
/// The first table entry whose full name equals `input`, or whose
/// abbreviation prefixes `input` while `input` prefixes the full name, wins.
/// Unrecognized input is returned unchanged.
pub fn expand(input: &str) -> &str {
    for (full, abbreviation) in COMMAND_NAMES {
        if input == *full {
            return full;
        }
        if !abbreviation.is_empty() && input.starts_with(abbreviation) && full.starts_with(input) {
            return full;
        }
    }
    input
}
