//! Generator trait - Backend abstraction
//!
//! Every target language implements [`Generator`]. The traversal itself lives
//! in [`generate_program`], which backends cannot override, so all of them
//! see declarations in the same order with the same lifecycle.

use log::{debug, info};

use crate::ast::{Const, ConstValue, Enum, Program, Service, Struct, Type, Typedef};
use crate::utils::{self, Error, Indenter, Result, TempNames};

/// Lifecycle phase of a generator instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Constructed,
    Initialized,
    Generating,
    Closed,
    /// A hook failed; the instance cannot be reused
    Failed,
}

/// State shared by every backend: the program being generated, the output
/// subdirectory, indentation, temporary names and the lifecycle phase.
#[derive(Debug)]
pub struct GeneratorCore<'a> {
    program: &'a Program,
    out_dir_base: String,
    indenter: Indenter,
    temps: TempNames,
    phase: Phase,
}

impl<'a> GeneratorCore<'a> {
    /// `out_dir_base` is the backend-specific directory name (`gen-*`)
    pub fn new(program: &'a Program, out_dir_base: impl Into<String>) -> Self {
        Self {
            program,
            out_dir_base: out_dir_base.into(),
            indenter: Indenter::new(),
            temps: TempNames::new(),
            phase: Phase::Constructed,
        }
    }

    pub fn program(&self) -> &'a Program {
        self.program
    }

    pub fn out_dir_base(&self) -> &str {
        &self.out_dir_base
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn indent_up(&mut self) {
        self.indenter.indent_up();
    }

    pub fn indent_down(&mut self) {
        self.indenter.indent_down();
    }

    pub fn indent(&self) -> String {
        self.indenter.indent()
    }

    /// Unique temporary name: `prefix` plus a per-instance counter
    pub fn tmp(&mut self, prefix: &str) -> String {
        self.temps.tmp(prefix)
    }

    fn enter(&mut self, phase: Phase) {
        debug!("{}: {:?} -> {:?}", self.out_dir_base, self.phase, phase);
        self.phase = phase;
    }
}

/// Code generation backend trait.
///
/// Required: the four per-declaration hooks plus access to the shared core.
/// Everything else has a default that a backend may override.
pub trait Generator<'a> {
    fn core(&self) -> &GeneratorCore<'a>;

    fn core_mut(&mut self) -> &mut GeneratorCore<'a>;

    /// Called once before any declaration is dispatched
    fn init_generator(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called once after every declaration was dispatched
    fn close_generator(&mut self) -> Result<()> {
        Ok(())
    }

    fn generate_typedef(&mut self, typedef: &'a Typedef) -> Result<()>;

    fn generate_enum(&mut self, tenum: &'a Enum) -> Result<()>;

    /// Receives all constants at once, so a backend can group their
    /// initialization in one block. Defaults to `generate_const` per item.
    fn generate_consts(&mut self, consts: &'a [Const]) -> Result<()> {
        for tconst in consts {
            self.generate_const(tconst)?;
        }
        Ok(())
    }

    fn generate_const(&mut self, _tconst: &'a Const) -> Result<()> {
        Ok(())
    }

    fn generate_struct(&mut self, tstruct: &'a Struct) -> Result<()>;

    /// Exceptions are structs unless a backend needs different semantics
    fn generate_xception(&mut self, txception: &'a Struct) -> Result<()> {
        self.generate_struct(txception)
    }

    fn generate_service(&mut self, tservice: &'a Service) -> Result<()>;

    fn get_program_name(&self, program: &Program) -> String {
        program.name.clone()
    }

    fn get_service_name(&self, service: &Service) -> String {
        service.name.clone()
    }

    /// Output directory: program output root + `/` + backend subdirectory + `/`
    fn get_out_dir(&self) -> String {
        let core = self.core();
        format!(
            "{}/{}/",
            core.program().out_path.trim_end_matches('/'),
            core.out_dir_base()
        )
    }

    /// Escape a string for use in generated sources
    fn escape_string(&self, input: &str) -> String {
        utils::escape_string(input)
    }

    fn get_escaped_string(&self, value: &ConstValue) -> String {
        self.escape_string(value.as_str())
    }

    /// Formatted name of the program being generated
    fn program_name(&self) -> String {
        self.get_program_name(self.core().program())
    }

    /// Get the true type behind a series of typedefs
    fn true_type(&self, ty: &'a Type) -> Result<&'a Type> {
        self.core().program().true_type(ty)
    }
}

/// Run a generator over its program.
///
/// Dispatch order: `init_generator`, typedefs, enums, all consts at once,
/// structs, exceptions, services, `close_generator`. Within each category
/// declarations are visited in source order. The first failing hook aborts
/// the run and `close_generator` is not called.
pub fn generate_program<'a, G>(generator: &mut G) -> Result<()>
where
    G: Generator<'a> + ?Sized,
{
    let program = generator.core().program();
    if generator.core().phase() != Phase::Constructed {
        return Err(Error::AlreadyGenerated {
            program: program.name.clone(),
        });
    }

    info!(
        "generating {} into {}",
        program.name,
        generator.get_out_dir()
    );

    match dispatch(generator, program) {
        Ok(()) => {
            generator.core_mut().enter(Phase::Closed);
            Ok(())
        }
        Err(e) => {
            generator.core_mut().enter(Phase::Failed);
            Err(e)
        }
    }
}

fn dispatch<'a, G>(generator: &mut G, program: &'a Program) -> Result<()>
where
    G: Generator<'a> + ?Sized,
{
    generator.init_generator()?;
    generator.core_mut().enter(Phase::Initialized);
    generator.core_mut().enter(Phase::Generating);

    for typedef in &program.typedefs {
        debug!("typedef {}", typedef.name);
        generator.generate_typedef(typedef)?;
    }

    for tenum in &program.enums {
        debug!("enum {}", tenum.name);
        generator.generate_enum(tenum)?;
    }

    debug!("{} consts", program.consts.len());
    generator.generate_consts(&program.consts)?;

    for tstruct in program.plain_structs() {
        debug!("struct {}", tstruct.name);
        generator.generate_struct(tstruct)?;
    }

    for txception in program.exceptions() {
        debug!("exception {}", txception.name);
        generator.generate_xception(txception)?;
    }

    for tservice in &program.services {
        debug!("service {}", tservice.name);
        generator.generate_service(tservice)?;
    }

    generator.close_generator()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Field, Function};
    use pretty_assertions::assert_eq;

    /// Records every hook invocation
    struct Recorder<'a> {
        core: GeneratorCore<'a>,
        events: Vec<String>,
        fail_on: Option<&'static str>,
    }

    impl<'a> Recorder<'a> {
        fn new(program: &'a Program) -> Self {
            Self {
                core: GeneratorCore::new(program, "gen-test"),
                events: Vec::new(),
                fail_on: None,
            }
        }

        fn record(&mut self, event: String) -> Result<()> {
            let failed = self.fail_on == Some(event.as_str());
            self.events.push(event);
            if failed {
                return Err(Error::CodeGen("boom".into()));
            }
            Ok(())
        }
    }

    impl<'a> Generator<'a> for Recorder<'a> {
        fn core(&self) -> &GeneratorCore<'a> {
            &self.core
        }

        fn core_mut(&mut self) -> &mut GeneratorCore<'a> {
            &mut self.core
        }

        fn init_generator(&mut self) -> Result<()> {
            assert_eq!(self.core.phase(), Phase::Constructed);
            self.record("init".into())
        }

        fn close_generator(&mut self) -> Result<()> {
            assert_eq!(self.core.phase(), Phase::Generating);
            self.record("close".into())
        }

        fn generate_typedef(&mut self, typedef: &'a Typedef) -> Result<()> {
            self.record(format!("typedef {}", typedef.name))
        }

        fn generate_enum(&mut self, tenum: &'a Enum) -> Result<()> {
            self.record(format!("enum {}", tenum.name))
        }

        fn generate_consts(&mut self, consts: &'a [Const]) -> Result<()> {
            let names: Vec<_> = consts.iter().map(|c| c.name.as_str()).collect();
            self.record(format!("consts [{}]", names.join(", ")))
        }

        fn generate_struct(&mut self, tstruct: &'a Struct) -> Result<()> {
            self.record(format!("struct {}", tstruct.name))
        }

        fn generate_service(&mut self, tservice: &'a Service) -> Result<()> {
            self.record(format!("service {}", tservice.name))
        }
    }

    /// Uses every default hook
    struct Minimal<'a> {
        core: GeneratorCore<'a>,
        structs: Vec<String>,
    }

    impl<'a> Generator<'a> for Minimal<'a> {
        fn core(&self) -> &GeneratorCore<'a> {
            &self.core
        }

        fn core_mut(&mut self) -> &mut GeneratorCore<'a> {
            &mut self.core
        }

        fn generate_typedef(&mut self, _typedef: &'a Typedef) -> Result<()> {
            Ok(())
        }

        fn generate_enum(&mut self, _tenum: &'a Enum) -> Result<()> {
            Ok(())
        }

        fn generate_struct(&mut self, tstruct: &'a Struct) -> Result<()> {
            self.structs.push(tstruct.name.clone());
            Ok(())
        }

        fn generate_service(&mut self, _tservice: &'a Service) -> Result<()> {
            Ok(())
        }
    }

    fn sample_program() -> Program {
        let mut program = Program::new("sample");
        program.typedefs.push(Typedef::new("B", Type::I32));
        program.typedefs.push(Typedef::new("A", Type::typedef("B")));
        program.enums.push(Enum::from_declared("Color", vec![("RED".into(), None)]).unwrap());
        program.consts.push(Const::new("Z", Type::I32, ConstValue::Integer(1)));
        program.consts.push(Const::new("Y", Type::String, ConstValue::String("y".into())));
        program.structs.push(Struct::exception("Oops", vec![]));
        program.structs.push(Struct::new("Zebra", vec![Field::new(1, "id", Type::I64)]));
        program.structs.push(Struct::new("Apple", vec![]));
        program.services.push(Service::new("Svc", vec![Function::new("ping", Type::Void, vec![])]));
        program
    }

    #[test]
    fn test_dispatch_order() {
        let program = sample_program();
        let mut gen = Recorder::new(&program);
        generate_program(&mut gen).unwrap();

        assert_eq!(
            gen.events,
            vec![
                "init",
                "typedef B",
                "typedef A",
                "enum Color",
                "consts [Z, Y]",
                "struct Zebra",
                "struct Apple",
                "struct Oops",
                "service Svc",
                "close",
            ]
        );
        assert_eq!(gen.core().phase(), Phase::Closed);
    }

    #[test]
    fn test_dispatch_follows_permutation() {
        let mut program = sample_program();
        program.typedefs.reverse();
        program.structs.reverse();
        program.consts.reverse();

        let mut gen = Recorder::new(&program);
        generate_program(&mut gen).unwrap();

        assert_eq!(
            gen.events,
            vec![
                "init",
                "typedef A",
                "typedef B",
                "enum Color",
                "consts [Y, Z]",
                "struct Apple",
                "struct Zebra",
                "struct Oops",
                "service Svc",
                "close",
            ]
        );
    }

    #[test]
    fn test_empty_program() {
        let program = Program::new("empty");
        let mut gen = Recorder::new(&program);
        generate_program(&mut gen).unwrap();

        // generate_consts still fires, with nothing in it
        assert_eq!(gen.events, vec!["init", "consts []", "close"]);
    }

    #[test]
    fn test_runs_only_once() {
        let program = Program::new("once");
        let mut gen = Recorder::new(&program);
        generate_program(&mut gen).unwrap();

        let err = generate_program(&mut gen).unwrap_err();
        assert!(matches!(err, Error::AlreadyGenerated { .. }));
        assert_eq!(gen.events, vec!["init", "consts []", "close"]);
    }

    #[test]
    fn test_failing_hook_aborts_run() {
        let program = sample_program();
        let mut gen = Recorder::new(&program);
        gen.fail_on = Some("struct Zebra");

        let err = generate_program(&mut gen).unwrap_err();
        assert!(matches!(err, Error::CodeGen(_)));
        assert_eq!(gen.events.last().map(String::as_str), Some("struct Zebra"));
        assert!(!gen.events.iter().any(|e| e == "close"));
        assert_eq!(gen.core().phase(), Phase::Failed);
        assert!(generate_program(&mut gen).is_err());
    }

    #[test]
    fn test_failing_init_aborts_before_any_hook() {
        let program = sample_program();
        let mut gen = Recorder::new(&program);
        gen.fail_on = Some("init");

        let err = generate_program(&mut gen).unwrap_err();
        assert!(matches!(err, Error::CodeGen(_)));
        assert_eq!(gen.events, vec!["init"]);
        assert_eq!(gen.core().phase(), Phase::Failed);
        assert!(matches!(
            generate_program(&mut gen),
            Err(Error::AlreadyGenerated { .. })
        ));
        assert_eq!(gen.events, vec!["init"]);
    }

    #[test]
    fn test_default_xception_delegates_to_struct() {
        let program = sample_program();
        let mut gen = Minimal {
            core: GeneratorCore::new(&program, "gen-min"),
            structs: Vec::new(),
        };
        generate_program(&mut gen).unwrap();
        assert_eq!(gen.structs, vec!["Zebra", "Apple", "Oops"]);

        // Calling the hook directly behaves exactly like generate_struct
        let oops = &program.structs[0];
        gen.structs.clear();
        gen.generate_xception(oops).unwrap();
        gen.generate_struct(oops).unwrap();
        assert_eq!(gen.structs, vec!["Oops", "Oops"]);
    }

    #[test]
    fn test_dispatch_through_trait_object() {
        let program = sample_program();
        let mut gen: Box<dyn Generator<'_> + '_> = Box::new(Recorder::new(&program));
        generate_program(gen.as_mut()).unwrap();
        assert_eq!(gen.core().phase(), Phase::Closed);
    }

    #[test]
    fn test_true_type_does_not_dispatch() {
        let program = sample_program();
        let gen = Recorder::new(&program);
        let alias = &program.typedefs[1].aliased;
        assert_eq!(gen.true_type(alias).unwrap(), &Type::I32);
        assert!(gen.events.is_empty());
    }

    #[test]
    fn test_default_names_and_paths() {
        let mut trailing = Program::new("tutorial");
        trailing.out_path = "build/".into();
        let gen = Recorder::new(&trailing);

        assert_eq!(gen.program_name(), "tutorial");
        assert_eq!(gen.get_service_name(&Service::new("Calc", vec![])), "Calc");
        assert_eq!(gen.get_out_dir(), "build/gen-test/");

        let mut plain = Program::new("tutorial");
        plain.out_path = "out".into();
        let gen = Recorder::new(&plain);
        assert_eq!(gen.get_out_dir(), "out/gen-test/");
    }

    #[test]
    fn test_core_helpers() {
        let program = Program::new("p");
        let mut gen = Recorder::new(&program);
        assert_eq!(gen.core_mut().tmp("x"), "x0");
        assert_eq!(gen.core_mut().tmp("x"), "x1");

        gen.core_mut().indent_up();
        gen.core_mut().indent_up();
        assert_eq!(gen.core().indent(), "    ");
        gen.core_mut().indent_down();
        assert_eq!(gen.core().indent(), "  ");
    }

    #[test]
    fn test_escaping() {
        let program = Program::new("p");
        let gen = Recorder::new(&program);
        assert_eq!(gen.escape_string("say \"hi\"\n"), "say \\\"hi\\\"\\n");
        assert_eq!(gen.get_escaped_string(&ConstValue::String("a\\b".into())), "a\\\\b");
        assert_eq!(gen.get_escaped_string(&ConstValue::Integer(3)), "");
    }
}
