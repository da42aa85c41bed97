//! Instructional templates for the two completion calls.

use crate::llm::ChatMessage;

/// Fence tag the generation template asks for.
pub const LANGUAGE_TAG: &str = "prolog";

/// Problem to SWI-Prolog. Ends with an opened fence so the model continues with code.
pub fn generation_prompt(problem: &str) -> String {
    format!(
        r#"You are a Prolog expert. Generate ONLY valid SWI-Prolog code with NO text outside code.

CRITICAL RULES:
1. ALWAYS define finite domains BEFORE using member/2
2. Use member(X, [val1, val2, val3]) with EXPLICIT lists only
3. NEVER use member(X, List) where List is undefined - causes infinite loops
4. Put all constraints EARLY to prune search space
5. Use atoms (lowercase): alice, bob, red, blue, knight, knave
6. Variables (Uppercase): X, Y, Z, Solution
7. Include :- initialization(main). and halt

GOOD PATTERN - Use this structure:
```
% Define solution with explicit finite domains
solve(Solution) :-
    % Step 1: Define structure with variables
    Solution = [person(name1, Attr1), person(name2, Attr2), person(name3, Attr3)],

    % Step 2: Define finite domains for each variable
    member(Attr1, [value1, value2, value3]),
    member(Attr2, [value1, value2, value3]),
    member(Attr3, [value1, value2, value3]),

    % Step 3: Add constraints early
    Attr1 \= Attr2,
    Attr2 \= Attr3,
    Attr1 \= Attr3,

    % Step 4: Add problem-specific constraints
    % (your logic here based on problem clues).

% Auto-execution
:- initialization(main).
main :-
    solve(Solution),
    writeln('Solution:'),
    print_solution(Solution),
    halt.

print_solution([]).
print_solution([H|T]) :- writeln(H), print_solution(T).
```

BAD PATTERNS - AVOID:
- member(X, SomeList) where SomeList is not a concrete list
- Recursive predicates without base cases
- Missing constraints (generates too many solutions)

PROBLEM TO SOLVE:
{problem}

Generate ONLY the Prolog code:
```{LANGUAGE_TAG}"#
    )
}

/// Raw engine output plus the original problem, back to prose.
pub fn interpretation_prompt(problem: &str, result: &str) -> String {
    format!(
        r#"You are helping translate a Prolog solution into natural language.

Original Problem:
{problem}

Prolog Output:
{result}

Provide a clear, natural language explanation of the solution. Be concise and direct."#
    )
}

pub fn generation_messages(problem: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::user(generation_prompt(problem))]
}

pub fn interpretation_messages(problem: &str, result: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::user(interpretation_prompt(problem, result))]
}
