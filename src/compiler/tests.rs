//! Unit tests for code generation.

use super::{
    compiler::{escape_assembly_string, generate, CodeGenerator, Target},
    registers::RegisterAllocator,
    stdlib::print_function,
};
use crate::{
    ast::types::Type,
    compile_source,
    errors::errors::{CodegenError, CompileError},
    parse_source,
    resolver::resolver::resolve,
    type_checker::type_checker::type_check,
};

fn assemble(source: &str) -> String {
    compile_source(source, "test.cminor", Target::Linux).unwrap()
}

fn codegen_error(source: &str) -> CodegenError {
    match compile_source(source, "test.cminor", Target::Linux) {
        Err(CompileError::Codegen(error)) => error,
        other => panic!("Expected a code generation error, found {:?}", other),
    }
}

fn has_line(asm: &str, line: &str) -> bool {
    asm.lines().any(|l| l.trim() == line)
}

#[test]
fn test_allocator_hands_out_pool_in_order() {
    let mut registers = RegisterAllocator::new();
    let first = registers.alloc().unwrap();
    let second = registers.alloc().unwrap();

    assert_eq!(first.name(), "%rbx");
    assert_eq!(second.name(), "%r10");
    assert_eq!(registers.live_count(), 2);

    registers.free(first);
    assert_eq!(registers.alloc().unwrap().name(), "%rbx");
}

#[test]
fn test_allocator_exhaustion() {
    let mut registers = RegisterAllocator::new();
    for _ in 0..7 {
        registers.alloc().unwrap();
    }
    assert_eq!(registers.live_count(), 7);
    assert!(matches!(
        registers.alloc(),
        Err(CodegenError::RegistersExhausted(7))
    ));

    registers.reset();
    assert_eq!(registers.live_count(), 0);
}

#[test]
fn test_target_mangling() {
    assert_eq!(Target::Linux.mangle("main"), "main");
    assert_eq!(Target::MacOs.mangle("main"), "_main");
    assert_eq!("macos".parse::<Target>(), Ok(Target::MacOs));
    assert_eq!("Linux".parse::<Target>(), Ok(Target::Linux));
    assert!("windows".parse::<Target>().is_err());
}

#[test]
fn test_print_functions() {
    assert_eq!(print_function(&Type::Integer), Some("print_integer"));
    assert_eq!(print_function(&Type::Character), Some("print_character"));
    assert_eq!(print_function(&Type::Void), None);
}

#[test]
fn test_global_scalars() {
    let asm = assemble("a: integer = 3; b: boolean = true; c: char = 'a'; d: integer; e: integer = -5;");

    assert!(asm.contains("a:\n\t.quad 3\n"));
    assert!(asm.contains("b:\n\t.quad 1\n"));
    assert!(asm.contains("c:\n\t.quad 97\n"));
    assert!(asm.contains("d:\n\t.quad 0\n"));
    assert!(asm.contains("e:\n\t.quad -5\n"));
    assert!(has_line(&asm, ".data"));
}

#[test]
fn test_global_string() {
    let asm = assemble("s: string = \"hi\\n\";");

    assert!(asm.contains(".LS0:\n\t.string \"hi\\n\"\n"));
    assert!(asm.contains("s:\n\t.quad .LS0\n"));
}

#[test]
fn test_global_reference_and_addition() {
    let asm = assemble("x: integer = 3; main: function integer () = { return x + 4; }");

    assert!(has_line(&asm, ".globl main"));
    assert!(has_line(&asm, "main:"));
    assert!(has_line(&asm, "movq x(%rip), %rbx"));
    assert!(has_line(&asm, "movq $4, %r10"));
    assert!(has_line(&asm, "addq %r10, %rbx"));
    assert!(has_line(&asm, "movq %rbx, %rax"));
    assert!(has_line(&asm, "ret"));
}

#[test]
fn test_macos_mangling() {
    let mut program = parse_source("main: function integer () = { return 0; }", "test.cminor").unwrap();
    resolve(&mut program);
    let asm = generate(&program, Target::MacOs).unwrap();

    assert!(has_line(&asm, ".globl _main"));
    assert!(has_line(&asm, "_main:"));
}

#[test]
fn test_prototype_emits_nothing() {
    let asm = assemble(
        "f: function integer (a: integer);
         main: function integer () = { return f(1); }",
    );

    assert!(!has_line(&asm, "f:"));
    assert!(has_line(&asm, "call f"));
}

#[test]
fn test_function_frame() {
    let asm = assemble(
        "f: function integer (a: integer, b: integer) = {
            c: integer = a;
            return c;
        }",
    );

    assert!(has_line(&asm, "pushq %rbp"));
    assert!(has_line(&asm, "movq %rsp, %rbp"));
    assert!(has_line(&asm, "subq $32, %rsp"));
    assert!(has_line(&asm, "movq %rdi, -8(%rbp)"));
    assert!(has_line(&asm, "movq %rsi, -16(%rbp)"));
    assert!(has_line(&asm, "movq -8(%rbp), %rbx"));
    assert!(has_line(&asm, "movq %rbx, -24(%rbp)"));

    for register in ["%rbx", "%r12", "%r13", "%r14", "%r15"] {
        assert!(has_line(&asm, &format!("pushq {}", register)));
        assert!(has_line(&asm, &format!("popq {}", register)));
    }

    // One epilogue for the return, one for falling off the end.
    assert_eq!(asm.lines().filter(|l| l.trim() == "ret").count(), 2);
}

#[test]
fn test_empty_frame_reserves_nothing() {
    let asm = assemble("main: function void () = { }");

    assert!(!asm.contains("subq $0"));
    assert!(has_line(&asm, "subq $8, %rsp"));
    assert!(has_line(&asm, "movq $0, %rax"));
}

#[test]
fn test_call_sequence() {
    let asm = assemble(
        "f: function integer (a: integer) = { return a; }
         main: function integer () = { return f(2); }",
    );

    let call = asm.find("\tcall f\n").unwrap();
    let push = asm.find("\tpushq %r10\n").unwrap();
    let argument = asm.find("\tmovq %rbx, %rdi\n").unwrap();
    let pop = asm.rfind("\tpopq %r10\n").unwrap();

    assert!(push < argument && argument < call && call < pop);
    assert!(has_line(&asm, "pushq %r11"));
    assert!(has_line(&asm, "movq %rax, %rbx"));
}

#[test]
fn test_print_dispatch() {
    let asm = assemble("main: function void () = { print 1, \"hi\", true, 'c'; }");

    assert!(has_line(&asm, "call print_integer"));
    assert!(has_line(&asm, "call print_string"));
    assert!(has_line(&asm, "call print_boolean"));
    assert!(has_line(&asm, "call print_character"));
    assert!(has_line(&asm, "leaq .LS0(%rip), %rbx"));
}

#[test]
fn test_arithmetic_lowering() {
    let asm = assemble(
        "main: function integer () = {
            a: integer = 7 * 3;
            b: integer = a / 2;
            c: integer = a % 2;
            return a ^ 2;
        }",
    );

    assert!(has_line(&asm, "imulq %r10"));
    assert!(has_line(&asm, "cqto"));
    assert!(has_line(&asm, "idivq %r10"));
    assert!(has_line(&asm, "movq %rdx, %rbx"));
    assert!(has_line(&asm, "call integer_power"));
}

#[test]
fn test_comparison_labels() {
    let asm = assemble("main: function boolean () = { return 1 < 2; }");

    assert!(has_line(&asm, "cmpq %r10, %rbx"));
    assert!(has_line(&asm, "jl .L0"));
    assert!(has_line(&asm, "movq $0, %rbx"));
    assert!(has_line(&asm, "jmp .L1"));
    assert!(has_line(&asm, ".L0:"));
    assert!(has_line(&asm, "movq $1, %rbx"));
    assert!(has_line(&asm, ".L1:"));
}

#[test]
fn test_string_comparison() {
    let asm = assemble(
        "s: string = \"a\";
         main: function boolean () = { return s != \"b\"; }",
    );

    assert!(has_line(&asm, "call string_cmp"));
    assert!(has_line(&asm, "xorq $1, %rbx"));
}

#[test]
fn test_short_circuit() {
    let asm = assemble("main: function boolean () = { return true && false; }");

    assert!(has_line(&asm, "cmpq $0, %rbx"));
    assert!(has_line(&asm, "je .L0"));
    assert!(has_line(&asm, "movq %r10, %rbx"));
    assert!(has_line(&asm, ".L0:"));
}

#[test]
fn test_increment_keeps_previous_value() {
    let asm = assemble("x: integer; main: function integer () = { return x++; }");

    assert!(has_line(&asm, "movq x(%rip), %rbx"));
    assert!(has_line(&asm, "movq %rbx, %r10"));
    assert!(has_line(&asm, "incq %rbx"));
    assert!(has_line(&asm, "movq %rbx, x(%rip)"));
    assert!(has_line(&asm, "movq %r10, %rax"));
}

#[test]
fn test_if_and_for_labels() {
    let asm = assemble(
        "main: function void () = {
            i: integer;
            for (i = 0; i < 3; i++) print i;
            if (i == 3) print 1; else print 2;
        }",
    );

    assert!(has_line(&asm, "jmp .L0"));
    assert!(has_line(&asm, "je .L1"));
    assert!(has_line(&asm, "je .L4"));
    assert!(has_line(&asm, "jmp .L5"));
    assert!(has_line(&asm, ".L5:"));
}

#[test]
fn test_generation_is_repeatable() {
    let source = "main: function integer () = { if (1 < 2) return 1; return 0; }";
    assert_eq!(assemble(source), assemble(source));
}

#[test]
fn test_registers_released_after_function() {
    let mut program = parse_source(
        "main: function integer () = { print 1 + 2 * 3; return (1 + 2) * (3 + 4); }",
        "test.cminor",
    )
    .unwrap();
    resolve(&mut program);
    assert_eq!(type_check(&program).error_count(), 0);

    let mut generator = CodeGenerator::new(Vec::new(), Target::Linux);
    generator.gen_program(&program).unwrap();
    // The return frees everything it allocated.
    assert_eq!(generator.registers.live_count(), 0);
}

#[test]
fn test_register_exhaustion_is_fatal() {
    let error = codegen_error(
        "main: function integer () = { return 1 + (2 + (3 + (4 + (5 + (6 + (7 + 8)))))); }",
    );
    assert!(matches!(error, CodegenError::RegistersExhausted(7)));
}

#[test]
fn test_arrays_are_fatal() {
    assert!(matches!(
        codegen_error("a: array [3] integer;"),
        CodegenError::ArrayUnsupported(_)
    ));
    assert!(matches!(
        codegen_error("main: function void () = { a: array [2] integer = {1, 2}; }"),
        CodegenError::ArrayUnsupported(_)
    ));
}

#[test]
fn test_too_many_parameters() {
    let error = codegen_error(
        "f: function integer (a: integer, b: integer, c: integer, d: integer,
                              e: integer, g: integer, h: integer) = { return a; }",
    );
    assert!(matches!(
        error,
        CodegenError::TooManyParameters { count: 7, limit: 6, .. }
    ));
}

#[test]
fn test_too_many_arguments() {
    for count in [7, 8] {
        let params: Vec<String> = (0..count).map(|i| format!("p{}: integer", i)).collect();
        let arguments: Vec<String> = (0..count).map(|i| i.to_string()).collect();
        let source = format!(
            "f: function integer ({}); main: function integer () = {{ return f({}); }}",
            params.join(", "),
            arguments.join(", ")
        );

        match codegen_error(&source) {
            CodegenError::TooManyArguments { name, count: found, limit } => {
                assert_eq!(name, "f");
                assert_eq!(found, count);
                assert_eq!(limit, 6);
            }
            other => panic!("Expected TooManyArguments, found {:?}", other),
        }
    }
}

#[test]
fn test_index_is_fatal() {
    let error = codegen_error("f: function integer (a: array [] integer) = { return a[1]; }");
    assert!(matches!(error, CodegenError::ArrayUnsupported(name) if name == "a"));

    let error = codegen_error("f: function void (a: array [] integer) = { a[0] = 1; }");
    assert!(matches!(error, CodegenError::ArrayUnsupported(name) if name == "a"));
}

#[test]
fn test_int_results_are_sign_extended() {
    let asm = assemble(
        "s: string = \"a\";
         main: function boolean () = {
            x: integer = -2;
            return (x ^ 3) < 0 && s == \"b\";
         }",
    );
    let lines: Vec<&str> = asm.lines().map(str::trim).collect();

    for function in ["call integer_power", "call string_cmp"] {
        let call = lines.iter().position(|line| *line == function).unwrap();
        assert_eq!(lines[call + 1], "cltq");
    }
}

#[test]
fn test_user_calls_keep_full_result() {
    let asm = assemble(
        "f: function integer () = { return 1; }
         main: function integer () = { print f(); return 0; }",
    );
    let lines: Vec<&str> = asm.lines().map(str::trim).collect();

    for function in ["call f", "call print_integer"] {
        let call = lines.iter().position(|line| *line == function).unwrap();
        assert_ne!(lines[call + 1], "cltq");
    }
}

#[test]
fn test_escape_assembly_string() {
    assert_eq!(escape_assembly_string("plain"), "plain");
    assert_eq!(escape_assembly_string("a\"b\\c\n"), "a\\\"b\\\\c\\n");
    assert_eq!(escape_assembly_string("\0"), "\\000");
}
