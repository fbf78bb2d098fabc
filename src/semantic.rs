use std::collections::HashSet;
use regex::Regex;
use crate::lexer::is_numeric;

// Identifiers that look like variables in C-like snippets but never are:
// type keywords, control keywords, and standard-library-adjacent names.
const IGNORED_WORDS: &[&str] = &[
    "int", "float", "double", "char", "void", "if", "else", "while", "for", "return",
    "include", "iostream", "stdio", "main", "printf", "scanf", "cout", "cin", "endl",
    "no", "error", "h",
];

#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub(crate) var_type: String,
    pub(crate) name: String,
    pub(crate) value: String,
    pub(crate) scope: String,
    pub(crate) line: usize,
}

struct SymbolTable {
    section: String,
    declarations: Vec<VariableDeclaration>,
    functions: HashSet<String>,
}

pub struct SemanticAnalyzer<'a> {
    source: &'a str,
    function_header: Regex,
    type_keyword: Regex,
    leading_type: Regex,
    identifier: Regex,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            function_header: Regex::new(r"\b(?:int|void|float|double|char)\s+([a-zA-Z_]\w*)\s*\(([^)]*)\)")
                .unwrap(),
            type_keyword: Regex::new(r"\b(int|float|double|char)\b").unwrap(),
            leading_type: Regex::new(r".*?\b(?:int|float|double|char)\b").unwrap(),
            identifier: Regex::new(r"\b[a-zA-Z_][a-zA-Z0-9_]*\b").unwrap(),
        }
    }

    pub fn analyze(&self) -> String {
        let table = self.collect_symbols();

        let mut result = String::from("Semantic Analysis Results:\n\n");
        result.push_str("Symbol Table:\n");
        result.push_str("----------------------------------------\n");
        result.push_str("Name        Type       Scope     Line\n");
        result.push_str("----------------------------------------\n");
        result.push_str(&table.section);

        result.push_str("\nType Checking:\n");
        result.push_str("---------------\n");
        result.push_str(&self.check_types(&table.declarations));

        result.push_str("\nUndefined Variables:\n");
        result.push_str("---------------------\n");
        result.push_str(&self.check_undeclared(&table.declarations, &table.functions));

        result
    }

    fn collect_symbols(&self) -> SymbolTable {
        let mut section = String::new();
        let mut declarations: Vec<VariableDeclaration> = Vec::new();
        let mut functions: HashSet<String> = HashSet::new();
        let mut scope_stack: Vec<String> = vec!["global".to_string()];

        for (idx, raw) in self.source.lines().enumerate() {
            let trimmed = raw.trim();
            let line_no = idx + 1;

            if trimmed.starts_with('#') {
                continue;
            }

            if let Some(caps) = self.function_header.captures(trimmed) {
                let func_name = caps[1].to_string();
                functions.insert(func_name.clone());
                scope_stack.push(func_name.clone());

                for param in caps[2].split(',').map(str::trim).filter(|p| !p.is_empty()) {
                    let mut pieces = param.split_whitespace();
                    if let (Some(var_type), Some(name)) = (pieces.next(), pieces.next()) {
                        section.push_str(&format!(
                            "{:<12} {:<10} {:<8} {}\n",
                            name, var_type, func_name, line_no
                        ));
                        declarations.push(VariableDeclaration {
                            var_type: var_type.to_string(),
                            name: name.to_string(),
                            value: "undefined".to_string(),
                            scope: func_name.clone(),
                            line: line_no,
                        });
                    }
                }
                // The function name itself is not a variable; skip the
                // declaration scan for this line.
                continue;
            }

            if trimmed.contains('{') {
                let current = current_scope(&scope_stack);
                scope_stack.push(current);
            }
            if trimmed.contains('}') && scope_stack.len() > 1 {
                scope_stack.pop();
            }

            if let Some(caps) = self.type_keyword.captures(trimmed) {
                let var_type = caps[1].to_string();
                let scope = current_scope(&scope_stack);
                let decl_part = self.leading_type.replacen(trimmed, 1, "").into_owned();

                for piece in decl_part.split(',') {
                    let piece = piece.trim().trim_end_matches(';').trim();
                    let (name, value) = match piece.split_once('=') {
                        Some((name, value)) => (name.trim(), value.trim()),
                        None => (piece, ""),
                    };

                    if name.is_empty() {
                        continue;
                    }

                    if declarations.iter().any(|d| d.name == name && d.scope == scope) {
                        section.push_str(&format!(
                            "Warning: Line {} - Variable '{}' redeclared in same scope\n",
                            line_no, name
                        ));
                    } else {
                        section.push_str(&format!(
                            "{:<12} {:<10} {:<8} {}\n",
                            name, var_type, scope, line_no
                        ));
                        declarations.push(VariableDeclaration {
                            var_type: var_type.clone(),
                            name: name.to_string(),
                            value: if value.is_empty() {
                                "undefined".to_string()
                            } else {
                                value.to_string()
                            },
                            scope: scope.clone(),
                            line: line_no,
                        });
                    }
                }
            }
        }

        SymbolTable {
            section,
            declarations,
            functions,
        }
    }

    fn check_types(&self, declarations: &[VariableDeclaration]) -> String {
        let mut section = String::new();

        for decl in declarations {
            if decl.value == "undefined" {
                continue;
            }

            let value_type = infer_value_type(&decl.value);
            let mismatch = match decl.var_type.as_str() {
                "int" => value_type != "int",
                "float" => value_type != "float" && value_type != "int",
                "char" => value_type != "char",
                _ => false,
            };

            if mismatch {
                section.push_str(&format!(
                    "Warning: Line {} - Assigning {} to {} variable '{}'\n",
                    decl.line, value_type, decl.var_type, decl.name
                ));
            }
        }

        section
    }

    // Syntactic over-approximation: any declared name anywhere satisfies any
    // usage anywhere, and the raw source (comments included) is scanned.
    fn check_undeclared(
        &self,
        declarations: &[VariableDeclaration],
        functions: &HashSet<String>,
    ) -> String {
        let ignored: HashSet<&str> = IGNORED_WORDS.iter().copied().collect();
        let declared: HashSet<&str> = declarations
            .iter()
            .map(|d| d.name.as_str())
            .chain(functions.iter().map(String::as_str))
            .collect();

        let mut section = String::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for m in self.identifier.find_iter(self.source) {
            let name = m.as_str();
            if ignored.contains(name) || !seen.insert(name) {
                continue;
            }
            if !declared.contains(name) {
                section.push_str(&format!(
                    "Warning: Variable '{}' used but not declared\n",
                    name
                ));
            }
        }

        section
    }
}

fn current_scope(scope_stack: &[String]) -> String {
    scope_stack
        .last()
        .cloned()
        .unwrap_or_else(|| "global".to_string())
}

fn infer_value_type(value: &str) -> &'static str {
    if is_numeric(value) && !value.contains('.') {
        "int"
    } else if is_numeric(value) {
        "float"
    } else if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        "string"
    } else if value.starts_with('\'') && value.ends_with('\'') && value.chars().count() == 3 {
        "char"
    } else {
        "unknown"
    }
}
