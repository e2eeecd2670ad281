//! In-memory program model backed by a `ProgramDecl`

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use super::decl::{FunctionDecl, ProgramDecl};
use super::ProgramModel;
use crate::errors::{DfaError, DfaResult};
use crate::shared::models::{Function, FunctionId, IfStatement, Value};

/// Program model holding every declaration in memory
#[derive(Debug, Clone)]
pub struct InMemoryProgramModel {
    name: String,
    functions: BTreeMap<FunctionId, FunctionDecl>,
    /// function name -> ids sharing it (overloads are not told apart)
    by_name: FxHashMap<String, Vec<FunctionId>>,
}

impl InMemoryProgramModel {
    pub fn from_decl(decl: ProgramDecl) -> DfaResult<Self> {
        let mut functions = BTreeMap::new();
        let mut by_name: FxHashMap<String, Vec<FunctionId>> = FxHashMap::default();

        for function in decl.functions {
            validate_function(&function)?;
            by_name
                .entry(function.name.clone())
                .or_default()
                .push(function.id);
            if let Some(previous) = functions.insert(function.id, function) {
                return Err(DfaError::InvalidProgram(format!(
                    "duplicate function id {} ({})",
                    previous.id, previous.name
                )));
            }
        }

        let name = decl.name.unwrap_or_else(|| "program".to_string());
        debug!(program = %name, functions = functions.len(), "program model loaded");
        Ok(Self {
            name,
            functions,
            by_name,
        })
    }

    pub fn from_json_str(json: &str) -> DfaResult<Self> {
        let decl: ProgramDecl = serde_json::from_str(json)?;
        Self::from_decl(decl)
    }

    /// Load from a JSON file; the program name defaults to the file stem
    pub fn from_json_file(path: impl AsRef<Path>) -> DfaResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut decl: ProgramDecl = serde_json::from_str(&content)?;
        if decl.name.is_none() {
            decl.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned());
        }
        Self::from_decl(decl)
    }

    pub fn decl(&self, function_id: FunctionId) -> Option<&FunctionDecl> {
        self.functions.get(&function_id)
    }
}

fn validate_function(function: &FunctionDecl) -> DfaResult<()> {
    let mut indexes: Vec<usize> = function.parameters.iter().map(|p| p.index).collect();
    indexes.sort_unstable();
    if indexes.windows(2).any(|pair| pair[0] == pair[1]) {
        return Err(DfaError::InvalidProgram(format!(
            "function {} declares two parameters with the same index",
            function.name
        )));
    }
    for stmt in &function.if_statements {
        if stmt.start_line > stmt.end_line {
            return Err(DfaError::InvalidProgram(format!(
                "function {}: if-statement lines {}..{} are reversed",
                function.name, stmt.start_line, stmt.end_line
            )));
        }
    }
    Ok(())
}

impl ProgramModel for InMemoryProgramModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn function_ids(&self) -> Vec<FunctionId> {
        self.functions.keys().copied().collect()
    }

    fn entry_ids(&self) -> Vec<FunctionId> {
        let flagged: Vec<FunctionId> = self
            .functions
            .values()
            .filter(|f| f.is_entry)
            .map(|f| f.id)
            .collect();
        if !flagged.is_empty() {
            return flagged;
        }
        self.resolve_callees("main")
    }

    fn build_function(&self, function_id: FunctionId) -> DfaResult<Function> {
        let decl = self
            .functions
            .get(&function_id)
            .ok_or(DfaError::UnknownFunction { function_id })?;

        let mut function = Function::new(decl.id, decl.name.clone(), decl.source.clone());
        function.transformed = decl.transformed.clone();
        function.paras = decl
            .parameters
            .iter()
            .map(|p| Value::para(p.name.clone(), p.line, p.index))
            .collect();
        function.rets = decl
            .returns
            .iter()
            .map(|r| Value::ret(r.name.clone(), r.line))
            .collect();
        function.fields = decl
            .fields
            .iter()
            .map(|f| Value::field(f.name.clone(), f.line))
            .collect();

        for site in &decl.call_sites {
            let info = function.call_site_info.entry(site.line).or_default();
            if info.callee_name.is_empty() {
                info.callee_name = site.callee.clone();
            }
            info.args.extend(
                site.args
                    .iter()
                    .map(|a| Value::arg(a.name.clone(), site.line, a.index)),
            );
            info.outputs.extend(
                site.outputs
                    .iter()
                    .map(|name| Value::out(name.clone(), site.line)),
            );
            for callee_id in self.resolve_callees(&site.callee) {
                if !info.callee_ids.contains(&callee_id) {
                    info.callee_ids.push(callee_id);
                }
            }
        }

        for stmt in &decl.if_statements {
            function.if_statements.insert(
                (stmt.start_line, stmt.end_line),
                IfStatement {
                    condition: stmt.condition.clone(),
                    condition_line: stmt.condition_line,
                    true_branch: stmt.true_branch,
                    else_branch: stmt.else_branch,
                },
            );
        }

        Ok(function)
    }

    fn resolve_callees(&self, callee_name: &str) -> Vec<FunctionId> {
        self.by_name.get(callee_name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::program_model::decl::{ArgumentDecl, CallSiteDecl, ParameterDecl};
    use crate::shared::models::ValueKind;

    fn two_functions() -> ProgramDecl {
        let mut main = FunctionDecl::new(1, "main", "int main() {\n  int x = 0;\n  div(x);\n}");
        main.call_sites.push(CallSiteDecl {
            line: 3,
            callee: "div".into(),
            args: vec![ArgumentDecl {
                name: "x".into(),
                index: 0,
            }],
            outputs: vec![],
        });
        let mut div = FunctionDecl::new(2, "div", "int div(int d) {\n  return 10 / d;\n}");
        div.parameters.push(ParameterDecl {
            name: "d".into(),
            line: 1,
            index: 0,
        });
        ProgramDecl {
            name: Some("sample".into()),
            functions: vec![main, div],
        }
    }

    #[test]
    fn test_build_function_resolves_callees_by_name() {
        let model = InMemoryProgramModel::from_decl(two_functions()).unwrap();
        let main = model.build_function(FunctionId(1)).unwrap();

        let site = &main.call_site_info[&3];
        assert_eq!(site.callee_ids, vec![FunctionId(2)]);
        assert_eq!(site.args[0].kind, ValueKind::Arg);
        assert_eq!(site.args[0].index, Some(0));
        assert!(main.reachable_summaries.is_empty());
    }

    #[test]
    fn test_unresolved_callee_is_empty() {
        let mut decl = two_functions();
        decl.functions[0].call_sites[0].callee = "dvi".into();
        let model = InMemoryProgramModel::from_decl(decl).unwrap();
        let main = model.build_function(FunctionId(1)).unwrap();
        assert!(main.call_site_info[&3].callee_ids.is_empty());
    }

    #[test]
    fn test_entries_default_to_main() {
        let model = InMemoryProgramModel::from_decl(two_functions()).unwrap();
        assert_eq!(model.entry_ids(), vec![FunctionId(1)]);

        let mut decl = two_functions();
        decl.functions[1].is_entry = true;
        let model = InMemoryProgramModel::from_decl(decl).unwrap();
        assert_eq!(model.entry_ids(), vec![FunctionId(2)]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut decl = two_functions();
        decl.functions[1].id = FunctionId(1);
        assert!(matches!(
            InMemoryProgramModel::from_decl(decl),
            Err(DfaError::InvalidProgram(_))
        ));
    }

    #[test]
    fn test_unknown_function() {
        let model = InMemoryProgramModel::from_decl(two_functions()).unwrap();
        assert!(matches!(
            model.build_function(FunctionId(9)),
            Err(DfaError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "functions": [
                {"id": 7, "name": "main", "source": "int main() {}", "is_entry": true}
            ]
        }"#;
        let model = InMemoryProgramModel::from_json_str(json).unwrap();
        assert_eq!(model.name(), "program");
        assert_eq!(model.entry_ids(), vec![FunctionId(7)]);
    }
}
