//! Built-in vulnerability rule pack
//!
//! Line-oriented regex rules, grouped per language. Intentionally small: the
//! analyzer behind them is a pluggable capability and a real engine brings
//! its own rules.

use crate::domain::scan::value_objects::{Language, Severity};

/// One pattern-based vulnerability rule
pub struct VulnerabilityRule {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    pub pattern: &'static str,
    /// Languages the rule applies to; empty means every language
    pub languages: &'static [Language],
    pub cwe_id: &'static str,
    pub recommendation: &'static str,
    pub references: &'static [&'static str],
}

impl VulnerabilityRule {
    pub fn applies_to(&self, language: Language) -> bool {
        self.languages.is_empty() || self.languages.contains(&language)
    }
}

/// All built-in rules.
pub fn default_rules() -> &'static [VulnerabilityRule] {
    DEFAULT_RULES
}

const DEFAULT_RULES: &[VulnerabilityRule] = &[
    VulnerabilityRule {
        id: "eval-usage",
        name: "Use of eval",
        description: "Dynamic code evaluation of runtime strings allows arbitrary code execution when input is attacker-controlled.",
        severity: Severity::Critical,
        pattern: r"\beval\s*\(",
        languages: &[Language::Javascript, Language::Python, Language::Php, Language::Ruby],
        cwe_id: "CWE-95",
        recommendation: "Remove eval; parse structured input with a safe deserializer instead.",
        references: &["https://cwe.mitre.org/data/definitions/95.html"],
    },
    VulnerabilityRule {
        id: "command-injection",
        name: "Shell command built from strings",
        description: "Passing concatenated strings to a shell runner lets crafted input break out into arbitrary commands.",
        severity: Severity::Critical,
        pattern: r"\b(?:child_process\.exec|os\.system|subprocess\.call|subprocess\.Popen|shell_exec|proc_open|Runtime\.getRuntime\(\)\.exec|exec\.Command)\s*\(",
        languages: &[],
        cwe_id: "CWE-78",
        recommendation: "Invoke the program directly with an argument vector; never route user input through a shell.",
        references: &["https://cwe.mitre.org/data/definitions/78.html"],
    },
    VulnerabilityRule {
        id: "sql-string-concat",
        name: "SQL query built by concatenation",
        description: "SQL statements assembled from string fragments and variables are injectable.",
        severity: Severity::High,
        pattern: r#"(?i)["'](?:select|insert|update|delete)\b[^"']*["']\s*(?:\+|%|\.format\(|\|\|)"#,
        languages: &[],
        cwe_id: "CWE-89",
        recommendation: "Use parameterized queries or prepared statements.",
        references: &["https://owasp.org/www-community/attacks/SQL_Injection"],
    },
    VulnerabilityRule {
        id: "hardcoded-credential",
        name: "Hardcoded credential",
        description: "A password or secret assigned from a literal ships the credential with the source tree.",
        severity: Severity::High,
        pattern: r#"(?i)\b(?:password|passwd|pwd|secret)\s*[:=]\s*["'][^"'\s]{4,}["']"#,
        languages: &[],
        cwe_id: "CWE-798",
        recommendation: "Load credentials from the environment or a secret manager.",
        references: &["https://cwe.mitre.org/data/definitions/798.html"],
    },
    VulnerabilityRule {
        id: "weak-hash",
        name: "Weak hash algorithm",
        description: "MD5 and SHA-1 are broken for integrity and password storage.",
        severity: Severity::Medium,
        pattern: r#"(?i)\b(?:md5|sha1)\s*\(|createHash\s*\(\s*["'](?:md5|sha1)["']|hashlib\.(?:md5|sha1)\b|MessageDigest\.getInstance\s*\(\s*["'](?:MD5|SHA-1)["']"#,
        languages: &[],
        cwe_id: "CWE-328",
        recommendation: "Use SHA-256 or stronger; for passwords use argon2 or bcrypt.",
        references: &["https://cwe.mitre.org/data/definitions/328.html"],
    },
    VulnerabilityRule {
        id: "insecure-deserialization",
        name: "Insecure deserialization",
        description: "Deserializing untrusted input with pickle or full-featured YAML loaders executes embedded payloads.",
        severity: Severity::High,
        pattern: r"\bpickle\.loads?\s*\(|\byaml\.load\s*\(|\bunserialize\s*\(|Marshal\.load\b",
        languages: &[Language::Python, Language::Php, Language::Ruby],
        cwe_id: "CWE-502",
        recommendation: "Use yaml.safe_load / JSON, or sign payloads before deserializing.",
        references: &["https://cwe.mitre.org/data/definitions/502.html"],
    },
    VulnerabilityRule {
        id: "dom-xss-sink",
        name: "DOM XSS sink",
        description: "Writing runtime strings into innerHTML or document.write renders unescaped markup.",
        severity: Severity::Medium,
        pattern: r"\.innerHTML\s*=|document\.write\s*\(|dangerouslySetInnerHTML",
        languages: &[Language::Javascript],
        cwe_id: "CWE-79",
        recommendation: "Assign textContent, or sanitize markup before insertion.",
        references: &["https://owasp.org/www-community/attacks/xss/"],
    },
    VulnerabilityRule {
        id: "insecure-random",
        name: "Insecure randomness for security decisions",
        description: "Math.random and friends are predictable and unfit for tokens or keys.",
        severity: Severity::Low,
        pattern: r"\bMath\.random\s*\(|\brandom\.random\s*\(|\brand\s*\(\s*\)|new Random\s*\(",
        languages: &[],
        cwe_id: "CWE-330",
        recommendation: "Use a cryptographically secure generator (crypto.randomBytes, secrets, SecureRandom).",
        references: &["https://cwe.mitre.org/data/definitions/330.html"],
    },
    VulnerabilityRule {
        id: "tls-verification-disabled",
        name: "TLS certificate verification disabled",
        description: "Disabling certificate verification allows trivial machine-in-the-middle interception.",
        severity: Severity::High,
        pattern: r"(?i)verify\s*=\s*False|rejectUnauthorized\s*:\s*false|CURLOPT_SSL_VERIFYPEER\s*,\s*(?:false|0)|InsecureSkipVerify\s*:\s*true",
        languages: &[],
        cwe_id: "CWE-295",
        recommendation: "Leave certificate verification on; pin or provision the expected CA instead.",
        references: &["https://cwe.mitre.org/data/definitions/295.html"],
    },
    VulnerabilityRule {
        id: "plaintext-http",
        name: "Plaintext HTTP endpoint",
        description: "Requests to hardcoded http:// endpoints transmit data unencrypted.",
        severity: Severity::Info,
        pattern: r#"["']http://[^"'\s]+["']"#,
        languages: &[],
        cwe_id: "CWE-319",
        recommendation: "Use https:// for anything leaving the host.",
        references: &["https://cwe.mitre.org/data/definitions/319.html"],
    },
];
