use regex::Regex;

// Operator classes ordered lowest precedence first; the generator splits at
// the lowest class it can so the rightmost top-level operator becomes the
// outermost (last-evaluated) instruction.
const PRECEDENCE: &[&[char]] = &[&['+', '-'], &['*', '/']];

#[derive(Debug, PartialEq)]
enum ExprResult {
    Value(String),
    Computed { code: Vec<String>, temp: String },
}

impl ExprResult {
    fn operand(&self) -> &str {
        match self {
            ExprResult::Value(value) => value,
            ExprResult::Computed { temp, .. } => temp,
        }
    }
}

pub struct IrGenerator<'a> {
    source: &'a str,
    operand: Regex,
    decl_with_init: Regex,
    decl_plain: Regex,
    assignment: Regex,
    string_segment: Regex,
}

impl<'a> IrGenerator<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            operand: Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$|^[0-9]+(\.[0-9]+)?$").unwrap(),
            decl_with_init: Regex::new(
                r"\b(int|float|double|char)\s+([a-zA-Z_][a-zA-Z0-9_]*)\s*=\s*([^;]+);",
            )
            .unwrap(),
            decl_plain: Regex::new(r"\b(int|float|double|char)\s+([a-zA-Z_][a-zA-Z0-9_]*);")
                .unwrap(),
            assignment: Regex::new(r"^([a-zA-Z_][a-zA-Z0-9_]*)\s*=\s*([^;]+);$").unwrap(),
            string_segment: Regex::new(r#"^".*"$"#).unwrap(),
        }
    }

    pub fn generate(&self) -> String {
        let mut result = String::from("Three-Address Code Intermediate Representation:\n\n");
        // Temporary numbering restarts at 1 for every generation pass.
        let mut temp_counter: usize = 1;

        for raw in self.source.lines() {
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }

            if line.contains("main()") || line.contains("main ()") {
                result.push_str("FUNC_BEGIN main\n");
                continue;
            }

            if line.starts_with("return") {
                let value = line["return".len()..].replacen(';', "", 1).trim().to_string();
                let expr = self.process_expression(&value, &mut temp_counter);
                push_code(&mut result, &expr);
                result.push_str(&format!("RETURN {}\n", expr.operand()));
                continue;
            }

            if let Some(caps) = self.decl_with_init.captures(line) {
                let var_type = &caps[1];
                let name = &caps[2];
                let value = caps[3].trim();

                result.push_str(&format!("DECLARE {} {}\n", var_type, name));
                let expr = self.process_expression(value, &mut temp_counter);
                push_code(&mut result, &expr);
                result.push_str(&format!("{} = {}\n", name, expr.operand()));
                continue;
            }

            if let Some(caps) = self.decl_plain.captures(line) {
                result.push_str(&format!("DECLARE {} {}\n", &caps[1], &caps[2]));
                continue;
            }

            if let Some(caps) = self.assignment.captures(line) {
                let name = &caps[1];
                let value = caps[2].trim();

                let expr = self.process_expression(value, &mut temp_counter);
                push_code(&mut result, &expr);
                result.push_str(&format!("{} = {}\n", name, expr.operand()));
                continue;
            }

            if line.contains("cout") {
                for part in line.split("<<").skip(1) {
                    let part = part.replacen(';', "", 1).trim().to_string();

                    if part == "endl" || part == "std::endl" {
                        result.push_str("PRINT NEWLINE\n");
                    } else if self.string_segment.is_match(&part) {
                        result.push_str(&format!("PRINT {}\n", part));
                    } else {
                        let expr = self.process_expression(&part, &mut temp_counter);
                        push_code(&mut result, &expr);
                        result.push_str(&format!("PRINT {}\n", expr.operand()));
                    }
                }
                continue;
            }
        }

        result.push_str("FUNC_END main\n");
        result
    }

    fn process_expression(&self, expr: &str, temp_counter: &mut usize) -> ExprResult {
        let mut expr = expr.trim().to_string();

        // A bare identifier or numeric literal is a terminal operand.
        if self.operand.is_match(&expr) {
            return ExprResult::Value(expr);
        }

        expr = strip_enclosing_parentheses(&expr);

        for ops in PRECEDENCE {
            if let Some((left, op, right)) = split_at_operator(&expr, ops) {
                let left_expr = self.process_expression(&left, temp_counter);
                let right_expr = self.process_expression(&right, temp_counter);

                let temp = format!("t{}", *temp_counter);
                *temp_counter += 1;

                let mut code = Vec::new();
                if let ExprResult::Computed { code: nested, .. } = &left_expr {
                    code.extend(nested.iter().cloned());
                }
                if let ExprResult::Computed { code: nested, .. } = &right_expr {
                    code.extend(nested.iter().cloned());
                }
                code.push(format!(
                    "{} = {} {} {}",
                    temp,
                    left_expr.operand(),
                    op,
                    right_expr.operand()
                ));

                return ExprResult::Computed { code, temp };
            }
        }

        ExprResult::Value(expr)
    }
}

fn push_code(result: &mut String, expr: &ExprResult) {
    if let ExprResult::Computed { code, .. } = expr {
        for instruction in code {
            result.push_str(instruction);
            result.push('\n');
        }
    }
}

fn strip_enclosing_parentheses(expr: &str) -> String {
    let mut expr = expr.to_string();

    while expr.starts_with('(') && expr.ends_with(')') {
        let chars: Vec<char> = expr.chars().collect();
        let mut depth = 0;
        let mut balanced = true;

        for (i, ch) in chars.iter().enumerate() {
            match ch {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            if depth == 0 && i < chars.len() - 1 {
                balanced = false;
                break;
            }
        }

        if !balanced {
            break;
        }
        expr = expr[1..expr.len() - 1].trim().to_string();
    }

    expr
}

// Finds the last occurrence of any of `ops` outside parentheses, scanning
// right to left at depth zero.
fn split_at_operator(expr: &str, ops: &[char]) -> Option<(String, char, String)> {
    let chars: Vec<char> = expr.chars().collect();
    let mut depth = 0;

    for i in (0..chars.len()).rev() {
        match chars[i] {
            ')' => depth += 1,
            '(' => depth -= 1,
            ch if depth == 0 && ops.contains(&ch) => {
                return Some((
                    chars[..i].iter().collect(),
                    ch,
                    chars[i + 1..].iter().collect(),
                ));
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_in_return_expression() {
        let source = "int main() {\n    return a + b * c;\n}";
        let listing = IrGenerator::new(source).generate();

        let t1 = listing.find("t1 = b * c").expect("multiplication first");
        let t2 = listing.find("t2 = a + t1").expect("addition second");
        assert!(t1 < t2);
        assert!(listing.contains("RETURN t2"));
        assert!(listing.contains("FUNC_BEGIN main"));
        assert!(listing.ends_with("FUNC_END main\n"));
    }

    #[test]
    fn test_same_precedence_chain_evaluates_left_to_right() {
        let listing = IrGenerator::new("x = a - b - c;").generate();
        assert!(listing.contains("t1 = a - b"));
        assert!(listing.contains("t2 = t1 - c"));
        assert!(listing.contains("x = t2"));
    }

    #[test]
    fn test_parenthesized_group_binds_first() {
        let listing = IrGenerator::new("x = (a + b) * c;").generate();
        assert!(listing.contains("t1 = a + b"));
        assert!(listing.contains("t2 = t1 * c"));
    }

    #[test]
    fn test_declarations() {
        let listing = IrGenerator::new("int x = 10;\nfloat y;").generate();
        assert!(listing.contains("DECLARE int x\nx = 10\n"));
        assert!(listing.contains("DECLARE float y\n"));
    }

    #[test]
    fn test_declaration_with_expression_initializer() {
        let listing = IrGenerator::new("int sum = a + b;").generate();
        assert!(listing.contains("DECLARE int sum\nt1 = a + b\nsum = t1\n"));
    }

    #[test]
    fn test_stream_insertion_chain() {
        let listing =
            IrGenerator::new("std::cout << \"Sum: \" << x + y << std::endl;").generate();

        assert!(listing.contains("PRINT \"Sum: \"\n"));
        assert!(listing.contains("t1 = x + y\nPRINT t1\n"));
        assert!(listing.contains("PRINT NEWLINE\n"));
    }

    #[test]
    fn test_blank_comment_and_preprocessor_lines_are_skipped() {
        let listing = IrGenerator::new("#include <iostream>\n// comment\n\n").generate();
        assert_eq!(
            listing,
            "Three-Address Code Intermediate Representation:\n\nFUNC_END main\n"
        );
    }

    #[test]
    fn test_temporaries_restart_per_invocation() {
        let generator = IrGenerator::new("x = a + b;\ny = c + d;");
        let first = generator.generate();
        let second = generator.generate();

        assert_eq!(first, second);
        assert!(first.contains("t1 = a + b"));
        assert!(first.contains("t2 = c + d"));
    }
}
