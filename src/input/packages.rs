//! Control sequence and environment tables, one per markup package.
//!
//! A control sequence is defined when any enabled package lists it; tables are
//! consulted in [`Package`] declaration order, so `base` definitions win.

use phf::{phf_map, phf_set};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator as _, IntoStaticStr};

use crate::input::parse_node::{Family, FracStyle, Notation, Variant};
use crate::types::PackageSet;

/// Markup extension package.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Package {
    /// Core TeX math
    Base,
    /// AMS math: matrices, `align`, `\operatorname`, extra symbols
    Ams,
    /// `\boldsymbol`
    Boldsymbol,
    /// `\bra`, `\ket`, `\braket`
    Braket,
    /// `\cancel`, `\bcancel`, `\xcancel`
    Cancel,
    /// `\color`, `\textcolor`
    Color,
    /// `\coloneqq` and friends, `dcases`
    Mathtools,
    /// Text-mode font switches (`\textbf`, `\textit`)
    Textmacros,
}

/// Meaning of a control sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// A single symbol of the given family
    Symbol(Family, &'static str),
    /// An identifier-like symbol (Greek letters): italic unless uppercase
    Letter(&'static str),
    /// Large operator symbol
    LargeOp(&'static str, bool),
    /// Named operator (`\sin`, `\lim`)
    NamedOp(&'static str, bool),
    /// `\limits` / `\nolimits`
    Limits(bool),
    /// `\frac` and its sized forms
    Frac(FracStyle),
    /// `\binom` and its sized forms
    Binom(FracStyle),
    /// `\sqrt`
    Sqrt,
    /// Accent character, and whether it stretches
    Accent(&'static str, bool),
    /// Math alphabet switch with one argument
    Font(Variant),
    /// `\boldsymbol`
    BoldSymbol,
    /// Text-mode argument in the given alphabet
    Text(Variant),
    /// `\operatorname`
    OperatorName,
    /// `\color` switch
    Color,
    /// `\textcolor{color}{body}`
    TextColor,
    /// `\left`
    Left,
    /// `\right`
    Right,
    /// Sized delimiter (`\big`), with its family
    Sized(f64, Family),
    /// Horizontal space in em
    Space(f64),
    /// `\begin`
    Begin,
    /// `\end`
    End,
    /// Enclosure
    Enclose(Notation),
    /// Braket-style fence: left, right
    Fence(&'static str, &'static str),
}

static BASE: phf::Map<&'static str, Command> = phf_map! {
    // Greek
    "alpha" => Command::Letter("\u{3B1}"),
    "beta" => Command::Letter("\u{3B2}"),
    "gamma" => Command::Letter("\u{3B3}"),
    "delta" => Command::Letter("\u{3B4}"),
    "epsilon" => Command::Letter("\u{3F5}"),
    "varepsilon" => Command::Letter("\u{3B5}"),
    "zeta" => Command::Letter("\u{3B6}"),
    "eta" => Command::Letter("\u{3B7}"),
    "theta" => Command::Letter("\u{3B8}"),
    "vartheta" => Command::Letter("\u{3D1}"),
    "iota" => Command::Letter("\u{3B9}"),
    "kappa" => Command::Letter("\u{3BA}"),
    "lambda" => Command::Letter("\u{3BB}"),
    "mu" => Command::Letter("\u{3BC}"),
    "nu" => Command::Letter("\u{3BD}"),
    "xi" => Command::Letter("\u{3BE}"),
    "pi" => Command::Letter("\u{3C0}"),
    "varpi" => Command::Letter("\u{3D6}"),
    "rho" => Command::Letter("\u{3C1}"),
    "varrho" => Command::Letter("\u{3F1}"),
    "sigma" => Command::Letter("\u{3C3}"),
    "varsigma" => Command::Letter("\u{3C2}"),
    "tau" => Command::Letter("\u{3C4}"),
    "upsilon" => Command::Letter("\u{3C5}"),
    "phi" => Command::Letter("\u{3D5}"),
    "varphi" => Command::Letter("\u{3C6}"),
    "chi" => Command::Letter("\u{3C7}"),
    "psi" => Command::Letter("\u{3C8}"),
    "omega" => Command::Letter("\u{3C9}"),
    "Gamma" => Command::Letter("\u{393}"),
    "Delta" => Command::Letter("\u{394}"),
    "Theta" => Command::Letter("\u{398}"),
    "Lambda" => Command::Letter("\u{39B}"),
    "Xi" => Command::Letter("\u{39E}"),
    "Pi" => Command::Letter("\u{3A0}"),
    "Sigma" => Command::Letter("\u{3A3}"),
    "Upsilon" => Command::Letter("\u{3A5}"),
    "Phi" => Command::Letter("\u{3A6}"),
    "Psi" => Command::Letter("\u{3A8}"),
    "Omega" => Command::Letter("\u{3A9}"),
    // Ordinary symbols
    "infty" => Command::Symbol(Family::Ord, "\u{221E}"),
    "partial" => Command::Symbol(Family::Ord, "\u{2202}"),
    "nabla" => Command::Symbol(Family::Ord, "\u{2207}"),
    "hbar" => Command::Symbol(Family::Ord, "\u{210F}"),
    "ell" => Command::Symbol(Family::Ord, "\u{2113}"),
    "emptyset" => Command::Symbol(Family::Ord, "\u{2205}"),
    "forall" => Command::Symbol(Family::Ord, "\u{2200}"),
    "exists" => Command::Symbol(Family::Ord, "\u{2203}"),
    "neg" => Command::Symbol(Family::Ord, "\u{AC}"),
    "prime" => Command::Symbol(Family::Ord, "\u{2032}"),
    "ldots" => Command::Symbol(Family::Ord, "\u{2026}"),
    "cdots" => Command::Symbol(Family::Ord, "\u{22EF}"),
    "vdots" => Command::Symbol(Family::Ord, "\u{22EE}"),
    "ddots" => Command::Symbol(Family::Ord, "\u{22F1}"),
    "angle" => Command::Symbol(Family::Ord, "\u{2220}"),
    "triangle" => Command::Symbol(Family::Ord, "\u{25B3}"),
    "backslash" => Command::Symbol(Family::Ord, "\\"),
    "|" => Command::Symbol(Family::Ord, "\u{2225}"),
    "vert" => Command::Symbol(Family::Ord, "|"),
    "Vert" => Command::Symbol(Family::Ord, "\u{2225}"),
    "$" => Command::Symbol(Family::Ord, "$"),
    "%" => Command::Symbol(Family::Ord, "%"),
    "&" => Command::Symbol(Family::Ord, "&"),
    "#" => Command::Symbol(Family::Ord, "#"),
    "_" => Command::Symbol(Family::Ord, "_"),
    // Binary operators
    "pm" => Command::Symbol(Family::Bin, "\u{B1}"),
    "mp" => Command::Symbol(Family::Bin, "\u{2213}"),
    "times" => Command::Symbol(Family::Bin, "\u{D7}"),
    "div" => Command::Symbol(Family::Bin, "\u{F7}"),
    "cdot" => Command::Symbol(Family::Bin, "\u{22C5}"),
    "ast" => Command::Symbol(Family::Bin, "\u{2217}"),
    "star" => Command::Symbol(Family::Bin, "\u{22C6}"),
    "circ" => Command::Symbol(Family::Bin, "\u{2218}"),
    "bullet" => Command::Symbol(Family::Bin, "\u{2219}"),
    "cap" => Command::Symbol(Family::Bin, "\u{2229}"),
    "cup" => Command::Symbol(Family::Bin, "\u{222A}"),
    "wedge" => Command::Symbol(Family::Bin, "\u{2227}"),
    "land" => Command::Symbol(Family::Bin, "\u{2227}"),
    "vee" => Command::Symbol(Family::Bin, "\u{2228}"),
    "lor" => Command::Symbol(Family::Bin, "\u{2228}"),
    "setminus" => Command::Symbol(Family::Bin, "\u{2216}"),
    "oplus" => Command::Symbol(Family::Bin, "\u{2295}"),
    "otimes" => Command::Symbol(Family::Bin, "\u{2297}"),
    // Relations
    "le" => Command::Symbol(Family::Rel, "\u{2264}"),
    "leq" => Command::Symbol(Family::Rel, "\u{2264}"),
    "ge" => Command::Symbol(Family::Rel, "\u{2265}"),
    "geq" => Command::Symbol(Family::Rel, "\u{2265}"),
    "ne" => Command::Symbol(Family::Rel, "\u{2260}"),
    "neq" => Command::Symbol(Family::Rel, "\u{2260}"),
    "approx" => Command::Symbol(Family::Rel, "\u{2248}"),
    "equiv" => Command::Symbol(Family::Rel, "\u{2261}"),
    "sim" => Command::Symbol(Family::Rel, "\u{223C}"),
    "simeq" => Command::Symbol(Family::Rel, "\u{2243}"),
    "cong" => Command::Symbol(Family::Rel, "\u{2245}"),
    "propto" => Command::Symbol(Family::Rel, "\u{221D}"),
    "in" => Command::Symbol(Family::Rel, "\u{2208}"),
    "notin" => Command::Symbol(Family::Rel, "\u{2209}"),
    "ni" => Command::Symbol(Family::Rel, "\u{220B}"),
    "subset" => Command::Symbol(Family::Rel, "\u{2282}"),
    "supset" => Command::Symbol(Family::Rel, "\u{2283}"),
    "subseteq" => Command::Symbol(Family::Rel, "\u{2286}"),
    "supseteq" => Command::Symbol(Family::Rel, "\u{2287}"),
    "ll" => Command::Symbol(Family::Rel, "\u{226A}"),
    "gg" => Command::Symbol(Family::Rel, "\u{226B}"),
    "perp" => Command::Symbol(Family::Rel, "\u{22A5}"),
    "mid" => Command::Symbol(Family::Rel, "\u{2223}"),
    "parallel" => Command::Symbol(Family::Rel, "\u{2225}"),
    "to" => Command::Symbol(Family::Rel, "\u{2192}"),
    "rightarrow" => Command::Symbol(Family::Rel, "\u{2192}"),
    "leftarrow" => Command::Symbol(Family::Rel, "\u{2190}"),
    "gets" => Command::Symbol(Family::Rel, "\u{2190}"),
    "leftrightarrow" => Command::Symbol(Family::Rel, "\u{2194}"),
    "Rightarrow" => Command::Symbol(Family::Rel, "\u{21D2}"),
    "Leftarrow" => Command::Symbol(Family::Rel, "\u{21D0}"),
    "Leftrightarrow" => Command::Symbol(Family::Rel, "\u{21D4}"),
    "mapsto" => Command::Symbol(Family::Rel, "\u{21A6}"),
    "iff" => Command::Symbol(Family::Rel, "\u{27FA}"),
    "implies" => Command::Symbol(Family::Rel, "\u{27F9}"),
    // Delimiters
    "{" => Command::Symbol(Family::Open, "{"),
    "}" => Command::Symbol(Family::Close, "}"),
    "lbrace" => Command::Symbol(Family::Open, "{"),
    "rbrace" => Command::Symbol(Family::Close, "}"),
    "langle" => Command::Symbol(Family::Open, "\u{27E8}"),
    "rangle" => Command::Symbol(Family::Close, "\u{27E9}"),
    "lfloor" => Command::Symbol(Family::Open, "\u{230A}"),
    "rfloor" => Command::Symbol(Family::Close, "\u{230B}"),
    "lceil" => Command::Symbol(Family::Open, "\u{2308}"),
    "rceil" => Command::Symbol(Family::Close, "\u{2309}"),
    // Punctuation
    "colon" => Command::Symbol(Family::Punct, ":"),
    // Large operators
    "sum" => Command::LargeOp("\u{2211}", true),
    "prod" => Command::LargeOp("\u{220F}", true),
    "coprod" => Command::LargeOp("\u{2210}", true),
    "bigcup" => Command::LargeOp("\u{22C3}", true),
    "bigcap" => Command::LargeOp("\u{22C2}", true),
    "bigoplus" => Command::LargeOp("\u{2A01}", true),
    "bigotimes" => Command::LargeOp("\u{2A02}", true),
    "int" => Command::LargeOp("\u{222B}", false),
    "oint" => Command::LargeOp("\u{222E}", false),
    // Named operators
    "lim" => Command::NamedOp("lim", true),
    "limsup" => Command::NamedOp("lim\u{2006}sup", true),
    "liminf" => Command::NamedOp("lim\u{2006}inf", true),
    "max" => Command::NamedOp("max", true),
    "min" => Command::NamedOp("min", true),
    "sup" => Command::NamedOp("sup", true),
    "inf" => Command::NamedOp("inf", true),
    "det" => Command::NamedOp("det", true),
    "gcd" => Command::NamedOp("gcd", true),
    "Pr" => Command::NamedOp("Pr", true),
    "sin" => Command::NamedOp("sin", false),
    "cos" => Command::NamedOp("cos", false),
    "tan" => Command::NamedOp("tan", false),
    "cot" => Command::NamedOp("cot", false),
    "sec" => Command::NamedOp("sec", false),
    "csc" => Command::NamedOp("csc", false),
    "arcsin" => Command::NamedOp("arcsin", false),
    "arccos" => Command::NamedOp("arccos", false),
    "arctan" => Command::NamedOp("arctan", false),
    "sinh" => Command::NamedOp("sinh", false),
    "cosh" => Command::NamedOp("cosh", false),
    "tanh" => Command::NamedOp("tanh", false),
    "log" => Command::NamedOp("log", false),
    "ln" => Command::NamedOp("ln", false),
    "exp" => Command::NamedOp("exp", false),
    "dim" => Command::NamedOp("dim", false),
    "ker" => Command::NamedOp("ker", false),
    "deg" => Command::NamedOp("deg", false),
    "arg" => Command::NamedOp("arg", false),
    "limits" => Command::Limits(true),
    "nolimits" => Command::Limits(false),
    // Structures
    "frac" => Command::Frac(FracStyle::Auto),
    "sqrt" => Command::Sqrt,
    "hat" => Command::Accent("\u{2C6}", false),
    "widehat" => Command::Accent("\u{2C6}", true),
    "tilde" => Command::Accent("\u{2DC}", false),
    "widetilde" => Command::Accent("\u{2DC}", true),
    "bar" => Command::Accent("\u{AF}", false),
    "overline" => Command::Accent("\u{2015}", true),
    "vec" => Command::Accent("\u{2192}", false),
    "overrightarrow" => Command::Accent("\u{2192}", true),
    "dot" => Command::Accent("\u{2D9}", false),
    "ddot" => Command::Accent("\u{A8}", false),
    "acute" => Command::Accent("\u{2CA}", false),
    "grave" => Command::Accent("\u{2CB}", false),
    "breve" => Command::Accent("\u{2D8}", false),
    "check" => Command::Accent("\u{2C7}", false),
    "mathrm" => Command::Font(Variant::Normal),
    "mathit" => Command::Font(Variant::Italic),
    "mathbf" => Command::Font(Variant::Bold),
    "mathcal" => Command::Font(Variant::Calligraphic),
    "mathsf" => Command::Font(Variant::SansSerif),
    "mathtt" => Command::Font(Variant::Monospace),
    "text" => Command::Text(Variant::Normal),
    "mbox" => Command::Text(Variant::Normal),
    "textrm" => Command::Text(Variant::Normal),
    "left" => Command::Left,
    "right" => Command::Right,
    "big" => Command::Sized(1.2, Family::Ord),
    "Big" => Command::Sized(1.8, Family::Ord),
    "bigg" => Command::Sized(2.4, Family::Ord),
    "Bigg" => Command::Sized(3.0, Family::Ord),
    "bigl" => Command::Sized(1.2, Family::Open),
    "bigr" => Command::Sized(1.2, Family::Close),
    "Bigl" => Command::Sized(1.8, Family::Open),
    "Bigr" => Command::Sized(1.8, Family::Close),
    "biggl" => Command::Sized(2.4, Family::Open),
    "biggr" => Command::Sized(2.4, Family::Close),
    // Spacing
    "," => Command::Space(0.1667),
    "thinspace" => Command::Space(0.1667),
    ":" => Command::Space(0.2222),
    ">" => Command::Space(0.2222),
    "medspace" => Command::Space(0.2222),
    ";" => Command::Space(0.2778),
    "thickspace" => Command::Space(0.2778),
    "!" => Command::Space(-0.1667),
    " " => Command::Space(0.25),
    "quad" => Command::Space(1.0),
    "qquad" => Command::Space(2.0),
    "begin" => Command::Begin,
    "end" => Command::End,
};

static AMS: phf::Map<&'static str, Command> = phf_map! {
    "dfrac" => Command::Frac(FracStyle::Display),
    "tfrac" => Command::Frac(FracStyle::Text),
    "binom" => Command::Binom(FracStyle::Auto),
    "dbinom" => Command::Binom(FracStyle::Display),
    "tbinom" => Command::Binom(FracStyle::Text),
    "operatorname" => Command::OperatorName,
    "mathbb" => Command::Font(Variant::DoubleStruck),
    "mathfrak" => Command::Font(Variant::Fraktur),
    "boxed" => Command::Enclose(Notation::Box),
    "iint" => Command::LargeOp("\u{222C}", false),
    "iiint" => Command::LargeOp("\u{222D}", false),
    "varnothing" => Command::Symbol(Family::Ord, "\u{2205}"),
    "therefore" => Command::Symbol(Family::Rel, "\u{2234}"),
    "because" => Command::Symbol(Family::Rel, "\u{2235}"),
    "lvert" => Command::Symbol(Family::Open, "|"),
    "rvert" => Command::Symbol(Family::Close, "|"),
    "lVert" => Command::Symbol(Family::Open, "\u{2225}"),
    "rVert" => Command::Symbol(Family::Close, "\u{2225}"),
    "leqslant" => Command::Symbol(Family::Rel, "\u{2A7D}"),
    "geqslant" => Command::Symbol(Family::Rel, "\u{2A7E}"),
    "nmid" => Command::Symbol(Family::Rel, "\u{2224}"),
    "square" => Command::Symbol(Family::Ord, "\u{25A1}"),
    "checkmark" => Command::Symbol(Family::Ord, "\u{2713}"),
};

static BOLDSYMBOL: phf::Map<&'static str, Command> = phf_map! {
    "boldsymbol" => Command::BoldSymbol,
};

static BRAKET: phf::Map<&'static str, Command> = phf_map! {
    "bra" => Command::Fence("\u{27E8}", "|"),
    "ket" => Command::Fence("|", "\u{27E9}"),
    "braket" => Command::Fence("\u{27E8}", "\u{27E9}"),
};

static CANCEL: phf::Map<&'static str, Command> = phf_map! {
    "cancel" => Command::Enclose(Notation::UpDiagonalStrike),
    "bcancel" => Command::Enclose(Notation::DownDiagonalStrike),
    "xcancel" => Command::Enclose(Notation::Cross),
};

static COLOR: phf::Map<&'static str, Command> = phf_map! {
    "color" => Command::Color,
    "textcolor" => Command::TextColor,
};

static MATHTOOLS: phf::Map<&'static str, Command> = phf_map! {
    "coloneqq" => Command::Symbol(Family::Rel, "\u{2254}"),
    "eqqcolon" => Command::Symbol(Family::Rel, "\u{2255}"),
    "dblcolon" => Command::Symbol(Family::Rel, "\u{2237}"),
    "coloneq" => Command::Symbol(Family::Rel, "\u{2254}"),
};

static TEXTMACROS: phf::Map<&'static str, Command> = phf_map! {
    "textbf" => Command::Text(Variant::Bold),
    "textit" => Command::Text(Variant::Italic),
    "texttt" => Command::Text(Variant::Monospace),
    "textsf" => Command::Text(Variant::SansSerif),
};

impl Package {
    const fn commands(self) -> &'static phf::Map<&'static str, Command> {
        match self {
            Self::Base => &BASE,
            Self::Ams => &AMS,
            Self::Boldsymbol => &BOLDSYMBOL,
            Self::Braket => &BRAKET,
            Self::Cancel => &CANCEL,
            Self::Color => &COLOR,
            Self::Mathtools => &MATHTOOLS,
            Self::Textmacros => &TEXTMACROS,
        }
    }
}

/// Looks up a control sequence name (without the backslash) among the
/// enabled packages.
#[must_use]
pub fn command(name: &str, packages: PackageSet) -> Option<Command> {
    Package::iter()
        .filter(|package| packages.contains(*package))
        .find_map(|package| package.commands().get(name).copied())
}

/// Environment layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentSpec {
    /// Package defining the environment
    pub package: Package,
    /// Fence on the left
    pub left: Option<&'static str>,
    /// Fence on the right
    pub right: Option<&'static str>,
    /// Whether the environment takes a column specification argument
    pub columns_argument: bool,
}

const fn env(
    package: Package,
    left: Option<&'static str>,
    right: Option<&'static str>,
) -> EnvironmentSpec {
    EnvironmentSpec {
        package,
        left,
        right,
        columns_argument: false,
    }
}

static ENVIRONMENTS: phf::Map<&'static str, EnvironmentSpec> = phf_map! {
    "array" => EnvironmentSpec {
        package: Package::Base,
        left: None,
        right: None,
        columns_argument: true,
    },
    "equation" => env(Package::Base, None, None),
    "equation*" => env(Package::Base, None, None),
    "eqnarray" => env(Package::Base, None, None),
    "eqnarray*" => env(Package::Base, None, None),
    "matrix" => env(Package::Ams, None, None),
    "smallmatrix" => env(Package::Ams, None, None),
    "pmatrix" => env(Package::Ams, Some("("), Some(")")),
    "bmatrix" => env(Package::Ams, Some("["), Some("]")),
    "Bmatrix" => env(Package::Ams, Some("{"), Some("}")),
    "vmatrix" => env(Package::Ams, Some("|"), Some("|")),
    "Vmatrix" => env(Package::Ams, Some("\u{2225}"), Some("\u{2225}")),
    "cases" => env(Package::Ams, Some("{"), None),
    "align" => env(Package::Ams, None, None),
    "align*" => env(Package::Ams, None, None),
    "aligned" => env(Package::Ams, None, None),
    "gather" => env(Package::Ams, None, None),
    "gather*" => env(Package::Ams, None, None),
    "gathered" => env(Package::Ams, None, None),
    "multline" => env(Package::Ams, None, None),
    "multline*" => env(Package::Ams, None, None),
    "split" => env(Package::Ams, None, None),
    "dcases" => env(Package::Mathtools, Some("{"), None),
    "rcases" => env(Package::Mathtools, None, Some("}")),
};

/// Looks up an environment among the enabled packages.
#[must_use]
pub fn environment(name: &str, packages: PackageSet) -> Option<EnvironmentSpec> {
    ENVIRONMENTS
        .get(name)
        .filter(|spec| packages.contains(spec.package))
        .copied()
}

/// Delimiters accepted after `\left`, `\right` and `\big`, keyed by token
/// text. `.` is the empty delimiter.
static DELIMITERS: phf::Map<&'static str, &'static str> = phf_map! {
    "." => "",
    "(" => "(",
    ")" => ")",
    "[" => "[",
    "]" => "]",
    "|" => "|",
    "/" => "/",
    "<" => "\u{27E8}",
    ">" => "\u{27E9}",
    "\\{" => "{",
    "\\}" => "}",
    "\\lbrace" => "{",
    "\\rbrace" => "}",
    "\\|" => "\u{2225}",
    "\\vert" => "|",
    "\\Vert" => "\u{2225}",
    "\\lvert" => "|",
    "\\rvert" => "|",
    "\\lVert" => "\u{2225}",
    "\\rVert" => "\u{2225}",
    "\\langle" => "\u{27E8}",
    "\\rangle" => "\u{27E9}",
    "\\lfloor" => "\u{230A}",
    "\\rfloor" => "\u{230B}",
    "\\lceil" => "\u{2308}",
    "\\rceil" => "\u{2309}",
    "\\backslash" => "\\",
    "\\uparrow" => "\u{2191}",
    "\\downarrow" => "\u{2193}",
};

/// Resolves the token after `\left`/`\right` to the delimiter it draws.
#[must_use]
pub fn delimiter(token: &str) -> Option<&'static str> {
    DELIMITERS.get(token).copied()
}

static NAMED_COLORS: phf::Set<&'static str> = phf_set! {
    "black", "white", "red", "green", "blue", "cyan", "magenta", "yellow",
    "gray", "grey", "orange", "purple", "brown", "pink", "violet", "olive",
    "teal", "navy", "maroon", "lime", "aqua", "fuchsia", "silver", "gold",
    "darkgray", "lightgray", "darkgreen", "darkblue", "darkred",
};

/// Whether `color` is a named color or a `#rgb` / `#rrggbb` literal.
#[must_use]
pub fn is_valid_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => NAMED_COLORS.contains(color.to_ascii_lowercase().as_str()),
    }
}
