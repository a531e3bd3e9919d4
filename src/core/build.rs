//! Build constraints for imported packages.
//!
//! Imported files are filtered for the host platform the way `go build`
//! does by default: `_GOOS`, `_GOARCH` and `_GOOS_GOARCH` file name suffixes
//! and `//go:build` lines. cgo counts as disabled and every `go1.N` release
//! tag as satisfied.

use std::env::consts;

const KNOWN_OS: &[&str] = &[
    "aix",
    "android",
    "darwin",
    "dragonfly",
    "freebsd",
    "hurd",
    "illumos",
    "ios",
    "js",
    "linux",
    "nacl",
    "netbsd",
    "openbsd",
    "plan9",
    "solaris",
    "wasip1",
    "windows",
    "zos",
];

const KNOWN_ARCH: &[&str] = &[
    "386",
    "amd64",
    "amd64p32",
    "arm",
    "armbe",
    "arm64",
    "arm64be",
    "loong64",
    "mips",
    "mipsle",
    "mips64",
    "mips64le",
    "mips64p32",
    "mips64p32le",
    "ppc",
    "ppc64",
    "ppc64le",
    "riscv",
    "riscv64",
    "s390",
    "s390x",
    "sparc",
    "sparc64",
    "wasm",
];

const UNIX_OS: &[&str] = &[
    "aix",
    "android",
    "darwin",
    "dragonfly",
    "freebsd",
    "hurd",
    "illumos",
    "ios",
    "linux",
    "netbsd",
    "openbsd",
    "solaris",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildContext {
    pub goos: &'static str,
    pub goarch: &'static str,
}

impl BuildContext {
    /// The platform keyfix runs on, spelled the Go way.
    pub fn host() -> Self {
        let goos = match consts::OS {
            "macos" => "darwin",
            os => os,
        };
        let goarch = match consts::ARCH {
            "x86_64" => "amd64",
            "x86" => "386",
            "aarch64" => "arm64",
            "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
            "powerpc64" => "ppc64",
            "loongarch64" => "loong64",
            "wasm32" => "wasm",
            arch => arch,
        };
        Self { goos, goarch }
    }

    /// Whether a file with this name and content is part of the build.
    pub fn includes(&self, file_name: &str, text: &str) -> bool {
        self.matches_file_name(file_name) && self.matches_constraints(text)
    }

    fn matches_file_name(&self, file_name: &str) -> bool {
        let stem = file_name.strip_suffix(".go").unwrap_or(file_name);
        let stem = stem.strip_suffix("_test").unwrap_or(stem);
        // The part before the first underscore never constrains.
        let Some((_, rest)) = stem.split_once('_') else {
            return true;
        };
        let parts: Vec<&str> = rest.split('_').collect();
        match parts.as_slice() {
            [.., os, arch] if KNOWN_OS.contains(os) && KNOWN_ARCH.contains(arch) => {
                self.has_tag(os) && self.has_tag(arch)
            }
            [.., last] if KNOWN_OS.contains(last) || KNOWN_ARCH.contains(last) => {
                self.has_tag(last)
            }
            _ => true,
        }
    }

    /// Evaluate every `//go:build` line in the file header.
    fn matches_constraints(&self, text: &str) -> bool {
        for line in text.lines() {
            let line = line.trim();
            if line.starts_with("package ") {
                break;
            }
            if let Some(expr) = line.strip_prefix("//go:build") {
                if expr.starts_with([' ', '\t']) && !self.eval(expr) {
                    return false;
                }
            }
        }
        true
    }

    fn has_tag(&self, tag: &str) -> bool {
        match tag {
            "gc" => true,
            "unix" => UNIX_OS.contains(&self.goos),
            _ if tag == self.goos || tag == self.goarch => true,
            "linux" => self.goos == "android",
            "darwin" => self.goos == "ios",
            "solaris" => self.goos == "illumos",
            _ => tag
                .strip_prefix("go1.")
                .is_some_and(|minor| !minor.is_empty() && minor.bytes().all(|b| b.is_ascii_digit())),
        }
    }

    /// Malformed expressions keep the file.
    fn eval(&self, expr: &str) -> bool {
        let mut parser = ConstraintParser {
            context: self,
            rest: expr,
        };
        match parser.or() {
            Some(value) if parser.rest.trim().is_empty() => value,
            _ => true,
        }
    }
}

/// Recursive descent over `||`, `&&`, `!`, parentheses and tags.
struct ConstraintParser<'a> {
    context: &'a BuildContext,
    rest: &'a str,
}

impl ConstraintParser<'_> {
    fn eat(&mut self, token: &str) -> bool {
        self.rest = self.rest.trim_start();
        match self.rest.strip_prefix(token) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn or(&mut self) -> Option<bool> {
        let mut value = self.and()?;
        while self.eat("||") {
            value |= self.and()?;
        }
        Some(value)
    }

    fn and(&mut self) -> Option<bool> {
        let mut value = self.not()?;
        while self.eat("&&") {
            value &= self.not()?;
        }
        Some(value)
    }

    fn not(&mut self) -> Option<bool> {
        if self.eat("!") {
            return self.not().map(|value| !value);
        }
        if self.eat("(") {
            let value = self.or()?;
            return self.eat(")").then_some(value);
        }
        self.rest = self.rest.trim_start();
        let end = self
            .rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (tag, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(self.context.has_tag(tag))
    }
}
