//! Backslash escape codes resolvable inside markup text.

/// Glyph substituted for an unknown escape code.
pub const PLACEHOLDER_GLYPH: char = '\u{275a}';

const SYMBOLS: &[(&str, char)] = &[
    ("Alpha", '\u{0391}'),
    ("Beta", '\u{0392}'),
    ("Gamma", '\u{0393}'),
    ("Delta", '\u{0394}'),
    ("Epsilon", '\u{0395}'),
    ("Zeta", '\u{0396}'),
    ("Eta", '\u{0397}'),
    ("Theta", '\u{0398}'),
    ("Iota", '\u{0399}'),
    ("Kappa", '\u{039a}'),
    ("Lambda", '\u{039b}'),
    ("Mu", '\u{039c}'),
    ("Nu", '\u{039d}'),
    ("Xi", '\u{039e}'),
    ("Omicron", '\u{039f}'),
    ("Pi", '\u{03a0}'),
    ("Rho", '\u{03a1}'),
    ("Sigma", '\u{03a3}'),
    ("Tau", '\u{03a4}'),
    ("Upsilon", '\u{03a5}'),
    ("Phi", '\u{03a6}'),
    ("Chi", '\u{03a7}'),
    ("Psi", '\u{03a8}'),
    ("Omega", '\u{03a9}'),
    ("alpha", '\u{03b1}'),
    ("beta", '\u{03b2}'),
    ("gamma", '\u{03b3}'),
    ("delta", '\u{03b4}'),
    ("epsilon", '\u{03b5}'),
    ("zeta", '\u{03b6}'),
    ("eta", '\u{03b7}'),
    ("theta", '\u{03b8}'),
    ("iota", '\u{03b9}'),
    ("kappa", '\u{03ba}'),
    ("lambda", '\u{03bb}'),
    ("mu", '\u{03bc}'),
    ("nu", '\u{03bd}'),
    ("xi", '\u{03be}'),
    ("omicron", '\u{03bf}'),
    ("pi", '\u{03c0}'),
    ("rho", '\u{03c1}'),
    ("fsigma", '\u{03c3}'),
    ("sigma", '\u{03c3}'),
    ("tau", '\u{03c4}'),
    ("upsilon", '\u{03c5}'),
    ("phi", '\u{03c6}'),
    ("chi", '\u{03c7}'),
    ("psi", '\u{03c8}'),
    ("omega", '\u{03c9}'),
    ("emph", '\u{00a1}'),
    ("qmark", '\u{00bf}'),
    ("cent", '\u{00a2}'),
    ("pound", '\u{00a3}'),
    ("euro", '\u{20ac}'),
    ("section", '\u{00a7}'),
    ("dot", '\u{00b7}'),
    ("mult", '\u{00d7}'),
    ("copy", '\u{00a9}'),
    ("reg", '\u{00ae}'),
    ("deg", '\u{00b0}'),
    ("pm", '\u{00b1}'),
    ("ne", '\u{2260}'),
    ("approx", '\u{2248}'),
];

/// Looks up the glyph for an escape code, e.g. `"alpha"` for `\alpha`.
#[must_use]
pub fn resolve_symbol(code: &str) -> Option<char> {
    SYMBOLS
        .iter()
        .find(|(name, _)| *name == code)
        .map(|&(_, glyph)| glyph)
}
